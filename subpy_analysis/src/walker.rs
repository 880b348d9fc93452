//! The traversal engine and its feature rules.
//!
//! [`Walker`] visits every construct of a [`SourceUnit`] depth first, in a
//! fixed per-construct order, and calls its [`Reporter`] for each feature a
//! construct exhibits. Features the reporter already allows are dropped
//! before location lookup, so permissive runs stay cheap.

use crate::error::{AnalysisError, AnalysisResult, ImportSite};
use crate::feature::Feature;
use crate::libs::LibraryMatcher;
use crate::scope::{ScopeKind, ScopeTracker};
use crate::strategy::{Reporter, Site};
use subpy_core::Span;
use subpy_parser::{
    Arguments, Comprehension, ExceptHandler, Expr, ExprKind, SourceUnit, Stmt, StmtKind, WithItem,
};
use tracing::{debug, trace, warn};

/// Numeric literal subtype, for implicit-cast detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericKind {
    Integer,
    Float,
    Complex,
}

fn numeric_kind(expr: &Expr) -> Option<NumericKind> {
    match expr.kind {
        ExprKind::Int(_) | ExprKind::BigInt(_) => Some(NumericKind::Integer),
        ExprKind::Float(_) => Some(NumericKind::Float),
        ExprKind::Complex(_) => Some(NumericKind::Complex),
        _ => None,
    }
}

fn is_destructuring(target: &Expr) -> bool {
    matches!(target.kind, ExprKind::Tuple(_) | ExprKind::List(_))
}

/// `x[a:b, ...]`: a tuple index with at least one slice or ellipsis.
fn is_extended_slice(index: &Expr) -> bool {
    match &index.kind {
        ExprKind::Tuple(dims) => dims
            .iter()
            .any(|d| matches!(d.kind, ExprKind::Slice { .. } | ExprKind::Ellipsis)),
        _ => false,
    }
}

/// Direct call to the bare name `name`.
fn is_call_to(expr: &Expr, name: &str) -> bool {
    match &expr.kind {
        ExprKind::Call { func, .. } => func.as_name() == Some(name),
        _ => false,
    }
}

// =============================================================================
// Walker
// =============================================================================

/// One traversal of one source unit.
pub struct Walker<'a, R> {
    unit: &'a SourceUnit,
    reporter: R,
    libraries: Option<&'a LibraryMatcher>,
    scopes: ScopeTracker<'a>,
    reports: usize,
}

impl<'a, R: Reporter> Walker<'a, R> {
    /// Prepare a walk over `unit`. Imports are checked against `libraries`
    /// when one is given.
    pub fn new(unit: &'a SourceUnit, reporter: R, libraries: Option<&'a LibraryMatcher>) -> Self {
        Self {
            unit,
            reporter,
            libraries,
            scopes: ScopeTracker::new(),
            reports: 0,
        }
    }

    /// Walk the whole module and hand back the reporter.
    ///
    /// # Errors
    /// Propagates the first error raised by the reporter, a rejected import,
    /// or an unhandled construct.
    pub fn run(mut self) -> AnalysisResult<R> {
        self.walk_module()?;
        Ok(self.reporter)
    }

    /// Walk the whole module, keeping the walker for inspection.
    ///
    /// # Errors
    /// See [`Walker::run`].
    pub fn walk_module(&mut self) -> AnalysisResult<()> {
        debug!(
            strategy = R::NAME,
            allowed = self.reporter.allowed().len(),
            statements = self.unit.module().body.len(),
            "walk started"
        );

        let unit = self.unit;
        let result = self.visit_body(&unit.module().body);

        match &result {
            Ok(()) => debug!(strategy = R::NAME, reports = self.reports, "walk finished"),
            Err(AnalysisError::FeatureNotSupported(violation)) => {
                debug!(strategy = R::NAME, %violation, "walk aborted");
            }
            Err(err) if err.is_internal() => {
                warn!(strategy = R::NAME, error = %err, "walk aborted");
            }
            Err(err) => debug!(strategy = R::NAME, error = %err, "walk aborted"),
        }
        result
    }

    /// Number of features passed to the reporter so far.
    #[inline]
    pub fn reports(&self) -> usize {
        self.reports
    }

    /// Number of open scope frames, including the global one.
    #[inline]
    pub fn scope_depth(&self) -> usize {
        self.scopes.depth()
    }

    /// The reporter.
    #[inline]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    fn site(&self, span: Span) -> Site<'a> {
        let unit = self.unit;
        let pos = unit.position(span);
        Site {
            line: pos.line,
            column: pos.column + 1,
            source_line: unit.line_text(pos.line),
        }
    }

    fn report(&mut self, span: Span, feature: Feature) -> AnalysisResult<()> {
        if self.reporter.allowed().contains(feature) {
            return Ok(());
        }
        let site = self.site(span);
        trace!(%feature, line = site.line, column = site.column, "feature");
        self.reports += 1;
        self.reporter.report(feature, &site)
    }

    fn check_library(&self, name: &str, span: Span) -> AnalysisResult<()> {
        let Some(matcher) = self.libraries else {
            return Ok(());
        };
        if matcher.matches(name) {
            return Ok(());
        }
        let site = self.site(span);
        Err(AnalysisError::LibraryNotSupported(ImportSite {
            library: name.to_string(),
            line: site.line,
            column: site.column,
            source_line: site.source_line.to_string(),
        }))
    }

    /// Run `f` with a new innermost frame, closing it on every exit path.
    fn with_frame<F>(&mut self, kind: ScopeKind, owner: &'a Stmt, f: F) -> AnalysisResult<()>
    where
        F: FnOnce(&mut Self) -> AnalysisResult<()>,
    {
        self.scopes.push(kind, owner);
        let result = f(self);
        self.scopes.pop();
        result
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn visit_body(&mut self, body: &'a [Stmt]) -> AnalysisResult<()> {
        body.iter().try_for_each(|stmt| self.visit_stmt(stmt))
    }

    fn visit_opt(&mut self, expr: Option<&'a Expr>) -> AnalysisResult<()> {
        match expr {
            Some(expr) => self.visit_expr(expr),
            None => Ok(()),
        }
    }

    fn visit_exprs(&mut self, exprs: &'a [Expr]) -> AnalysisResult<()> {
        exprs.iter().try_for_each(|expr| self.visit_expr(expr))
    }

    /// Visit a statement.
    fn visit_stmt(&mut self, stmt: &'a Stmt) -> AnalysisResult<()> {
        let span = stmt.span;
        match &stmt.kind {
            StmtKind::Expr(value) => self.visit_expr(value),

            StmtKind::Assign { targets, value } => {
                if targets.len() > 1 || targets.iter().any(is_destructuring) {
                    self.report(span, Feature::TupleUnpacking)?;
                }
                self.visit_exprs(targets)?;
                self.visit_expr(value)?;
                if targets.iter().any(|t| t.as_name() == Some("__metaclass__")) {
                    self.report(span, Feature::Metaclasses)?;
                }
                Ok(())
            }

            StmtKind::AugAssign { target, value, .. } => {
                self.visit_expr(target)?;
                self.visit_expr(value)
            }

            StmtKind::AnnAssign {
                target,
                annotation,
                value,
                ..
            } => {
                self.visit_expr(target)?;
                self.visit_expr(annotation)?;
                self.visit_opt(value.as_deref())
            }

            StmtKind::Return(value) => {
                self.visit_opt(value.as_deref())?;
                if value
                    .as_deref()
                    .is_some_and(|v| matches!(v.kind, ExprKind::Tuple(_)))
                {
                    self.report(span, Feature::MultipleReturn)?;
                }
                Ok(())
            }

            StmtKind::Delete(targets) => {
                self.visit_exprs(targets)?;
                self.report(span, Feature::DelVar)
            }

            StmtKind::Pass | StmtKind::Break | StmtKind::Nonlocal(_) => Ok(()),

            StmtKind::Continue => self.report(span, Feature::Continue),

            StmtKind::Raise { exc, cause } => {
                self.visit_opt(exc.as_deref())?;
                self.visit_opt(cause.as_deref())?;
                self.report(span, Feature::Exceptions)
            }

            StmtKind::Assert { test, msg } => {
                self.report(span, Feature::Assertions)?;
                self.visit_expr(test)?;
                self.visit_opt(msg.as_deref())
            }

            StmtKind::Global(_) => self.report(span, Feature::Globals),

            StmtKind::Print { dest, values, .. } => {
                self.report(span, Feature::Printing)?;
                self.visit_opt(dest.as_deref())?;
                self.visit_exprs(values)
            }

            StmtKind::Exec {
                body,
                globals,
                locals,
            } => {
                self.report(span, Feature::Exec)?;
                self.visit_expr(body)?;
                self.visit_opt(globals.as_deref())?;
                self.visit_opt(locals.as_deref())
            }

            StmtKind::Import(names) => names
                .iter()
                .try_for_each(|alias| self.check_library(&alias.name, span)),

            StmtKind::ImportFrom {
                module,
                names,
                level,
            } => {
                if names.iter().any(|alias| alias.name == "*") {
                    self.report(span, Feature::ImportStar)?;
                }
                if *level > 0 {
                    // Package-local imports are not subject to the allow-list
                    return self.report(span, Feature::RelativeImports);
                }
                let Some(module) = module else {
                    return Ok(());
                };
                // Names pulled from an allowed module are allowed
                if self.libraries.is_some_and(|m| m.matches(module)) {
                    return Ok(());
                }
                names.iter().try_for_each(|alias| {
                    self.check_library(&format!("{module}.{}", alias.name), span)
                })
            }

            StmtKind::If { test, body, orelse } | StmtKind::While { test, body, orelse } => {
                self.visit_expr(test)?;
                self.visit_body(body)?;
                self.visit_body(orelse)
            }

            StmtKind::For {
                target,
                iter,
                body,
                orelse,
            }
            | StmtKind::AsyncFor {
                target,
                iter,
                body,
                orelse,
            } => {
                self.visit_expr(target)?;
                self.visit_expr(iter)?;
                self.visit_body(body)?;
                self.visit_body(orelse)?;

                if !is_call_to(iter, "range") && !is_call_to(iter, "xrange") {
                    self.report(span, Feature::CustomIterators)?;
                }
                if is_destructuring(target) {
                    self.report(target.span, Feature::TupleUnpacking)?;
                }
                Ok(())
            }

            StmtKind::With { items, body } | StmtKind::AsyncWith { items, body } => {
                self.report(span, Feature::ContextManagers)?;
                items.iter().try_for_each(|item| self.visit_with_item(item))?;
                self.visit_body(body)
            }

            StmtKind::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => {
                self.visit_body(body)?;
                handlers
                    .iter()
                    .try_for_each(|handler| self.visit_handler(handler))?;
                self.visit_body(orelse)?;
                self.visit_body(finalbody)?;
                if !handlers.is_empty() || !finalbody.is_empty() {
                    self.report(span, Feature::Exceptions)?;
                }
                Ok(())
            }

            StmtKind::FunctionDef {
                args,
                body,
                decorator_list,
                returns,
                ..
            }
            | StmtKind::AsyncFunctionDef {
                args,
                body,
                decorator_list,
                returns,
                ..
            } => {
                self.check_arguments(args, span)?;

                // Decorators, defaults and annotations belong to the enclosing scope
                self.visit_exprs(decorator_list)?;
                if !decorator_list.is_empty() {
                    self.report(span, Feature::Decorators)?;
                }
                self.visit_parameters(args)?;
                self.visit_opt(returns.as_deref())?;

                if self.scopes.in_function() {
                    self.report(span, Feature::Closures)?;
                }

                self.with_frame(ScopeKind::Function, stmt, |w| w.visit_body(body))
            }

            StmtKind::ClassDef {
                bases,
                keywords,
                body,
                decorator_list,
                ..
            } => {
                self.report(span, Feature::Classes)?;

                self.visit_exprs(bases)?;
                if !bases.is_empty() {
                    self.report(span, Feature::Inheritance)?;
                }
                if bases.len() > 1 {
                    self.report(span, Feature::MInheritance)?;
                }

                keywords
                    .iter()
                    .try_for_each(|kw| self.visit_expr(&kw.value))?;
                if keywords.iter().any(|kw| kw.arg.as_deref() == Some("metaclass")) {
                    self.report(span, Feature::Metaclasses)?;
                }

                self.visit_exprs(decorator_list)?;
                if !decorator_list.is_empty() {
                    self.report(span, Feature::ClassDecorators)?;
                }

                self.with_frame(ScopeKind::Class, stmt, |w| w.visit_body(body))
            }
        }
    }

    fn visit_with_item(&mut self, item: &'a WithItem) -> AnalysisResult<()> {
        self.visit_expr(&item.context_expr)?;
        self.visit_opt(item.optional_vars.as_ref())
    }

    fn visit_handler(&mut self, handler: &'a ExceptHandler) -> AnalysisResult<()> {
        self.visit_opt(handler.typ.as_ref())?;
        self.visit_body(&handler.body)?;
        self.report(handler.span, Feature::Exceptions)
    }

    /// Variadic and keyword parameter rules shared by `def` and `lambda`.
    fn check_arguments(&mut self, args: &Arguments, span: Span) -> AnalysisResult<()> {
        if args.vararg.is_some() {
            self.report(span, Feature::VarArgs)?;
        }
        let has_defaults =
            !args.defaults.is_empty() || args.kw_defaults.iter().any(Option::is_some);
        if args.kwarg.is_some() || has_defaults {
            self.report(span, Feature::KeywordArgs)?;
        }
        Ok(())
    }

    /// Default values and annotations, in source order.
    fn visit_parameters(&mut self, args: &'a Arguments) -> AnalysisResult<()> {
        let positional = args.posonlyargs.iter().chain(&args.args);
        let keyword_only = args.kwonlyargs.iter();
        positional
            .chain(&args.vararg)
            .chain(keyword_only)
            .chain(&args.kwarg)
            .try_for_each(|arg| self.visit_opt(arg.annotation.as_deref()))?;

        self.visit_exprs(&args.defaults)?;
        args.kw_defaults
            .iter()
            .try_for_each(|default| self.visit_opt(default.as_ref()))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Visit an expression.
    fn visit_expr(&mut self, expr: &'a Expr) -> AnalysisResult<()> {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Int(_)
            | ExprKind::BigInt(_)
            | ExprKind::Float(_)
            | ExprKind::Complex(_)
            | ExprKind::String(_)
            | ExprKind::Bytes(_)
            | ExprKind::Bool(_)
            | ExprKind::None
            | ExprKind::Ellipsis
            | ExprKind::Name(_) => Ok(()),

            ExprKind::NamedExpr { target, value } => {
                self.visit_expr(target)?;
                self.visit_expr(value)
            }

            ExprKind::List(elts) => {
                self.visit_exprs(elts)?;
                if let Some((first, rest)) = elts.split_first() {
                    let kind = first.kind.name();
                    if rest.iter().any(|e| e.kind.name() != kind) {
                        self.report(span, Feature::HeteroList)?;
                    }
                }
                Ok(())
            }

            ExprKind::Tuple(elts) | ExprKind::Set(elts) => self.visit_exprs(elts),

            ExprKind::Dict { keys, values } => {
                keys.iter()
                    .try_for_each(|key| self.visit_opt(key.as_ref()))?;
                self.visit_exprs(values)
            }

            ExprKind::ListComp { elt, generators } => {
                self.visit_expr(elt)?;
                self.visit_generators(generators)?;
                self.report(span, Feature::ListComp)
            }

            ExprKind::SetComp { elt, generators } => {
                self.visit_expr(elt)?;
                self.visit_generators(generators)?;
                self.report(span, Feature::SetComp)
            }

            ExprKind::DictComp {
                key,
                value,
                generators,
            } => {
                self.visit_expr(key)?;
                self.visit_expr(value)?;
                self.visit_generators(generators)?;
                self.report(span, Feature::DictComp)
            }

            ExprKind::GeneratorExp { elt, generators } => {
                self.visit_expr(elt)?;
                self.visit_generators(generators)?;
                self.report(span, Feature::GeneratorExp)
            }

            ExprKind::BinOp { left, right, .. } => {
                self.visit_expr(left)?;
                self.visit_expr(right)?;
                if let (Some(a), Some(b)) = (numeric_kind(left), numeric_kind(right)) {
                    if a != b {
                        self.report(span, Feature::ImplicitCasts)?;
                    }
                }
                Ok(())
            }

            ExprKind::UnaryOp { operand, .. } => self.visit_expr(operand),

            ExprKind::BoolOp { values, .. } => {
                self.visit_exprs(values)?;
                if values.iter().any(|v| numeric_kind(v).is_some()) {
                    self.report(span, Feature::ImplicitCasts)?;
                }
                Ok(())
            }

            ExprKind::Compare {
                left, comparators, ..
            } => {
                if comparators.len() > 1 {
                    self.report(span, Feature::ChainComparison)?;
                }
                self.visit_expr(left)?;
                self.visit_exprs(comparators)
            }

            ExprKind::Attribute { value, .. } => self.visit_expr(value),

            ExprKind::Subscript { value, slice } => {
                self.visit_expr(value)?;
                self.visit_slice(slice)?;

                let extended = is_extended_slice(slice);
                if extended {
                    self.report(span, Feature::FancyIndexing)?;
                }
                let ellipsis = match &slice.kind {
                    ExprKind::Ellipsis => true,
                    ExprKind::Tuple(dims) if extended => {
                        dims.iter().any(|d| matches!(d.kind, ExprKind::Ellipsis))
                    }
                    _ => false,
                };
                if ellipsis {
                    self.report(span, Feature::Ellipsi)?;
                }
                Ok(())
            }

            ExprKind::Slice { .. } => {
                let site = self.site(span);
                Err(AnalysisError::UnhandledConstruct {
                    construct: expr.kind.name(),
                    line: site.line,
                    column: site.column,
                })
            }

            ExprKind::Starred(value) | ExprKind::Await(value) => self.visit_expr(value),

            ExprKind::Call {
                func,
                args,
                keywords,
            } => {
                self.visit_expr(func)?;
                self.visit_exprs(args)?;
                keywords
                    .iter()
                    .try_for_each(|kw| self.visit_expr(&kw.value))?;

                if args.iter().any(|a| matches!(a.kind, ExprKind::Starred(_))) {
                    self.report(span, Feature::VarArgs)?;
                }
                if !keywords.is_empty() {
                    self.report(span, Feature::KeywordArgs)?;
                }
                match func.as_name() {
                    Some("print") => self.report(span, Feature::Printing),
                    Some("exec") => self.report(span, Feature::Exec),
                    _ => Ok(()),
                }
            }

            ExprKind::Lambda { args, body } => {
                self.report(span, Feature::Lambda)?;
                self.check_arguments(args, span)?;
                self.visit_parameters(args)?;
                self.visit_expr(body)
            }

            ExprKind::IfExp { test, body, orelse } => {
                self.visit_expr(test)?;
                self.visit_expr(body)?;
                self.visit_expr(orelse)?;
                self.report(span, Feature::Ternary)
            }

            ExprKind::Yield(value) => {
                self.report(span, Feature::Generators)?;
                self.visit_opt(value.as_deref())
            }

            ExprKind::YieldFrom(value) => {
                self.report(span, Feature::Generators)?;
                self.visit_expr(value)
            }
        }
    }

    fn visit_generators(&mut self, generators: &'a [Comprehension]) -> AnalysisResult<()> {
        generators.iter().try_for_each(|comp| {
            self.visit_expr(&comp.target)?;
            self.visit_expr(&comp.iter)?;
            self.visit_exprs(&comp.ifs)
        })
    }

    /// Visit a subscript index, the only place a slice may appear.
    fn visit_slice(&mut self, index: &'a Expr) -> AnalysisResult<()> {
        match &index.kind {
            ExprKind::Slice { lower, upper, step } => {
                self.visit_opt(lower.as_deref())?;
                self.visit_opt(upper.as_deref())?;
                self.visit_opt(step.as_deref())
            }
            ExprKind::Tuple(dims) if is_extended_slice(index) => {
                dims.iter().try_for_each(|dim| self.visit_slice(dim))
            }
            _ => self.visit_expr(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureSet;
    use crate::strategy::{Checker, Detector, Validator};

    fn unit(src: &str) -> SourceUnit {
        SourceUnit::parse(src).unwrap()
    }

    fn detected(src: &str) -> FeatureSet {
        let unit = unit(src);
        Walker::new(&unit, Detector::new(), None)
            .run()
            .unwrap()
            .into_result()
            .features()
    }

    #[test]
    fn test_helpers() {
        let call = subpy_parser::parse_expression("range(3)").unwrap();
        assert!(is_call_to(&call, "range"));
        assert!(!is_call_to(&call, "xrange"));

        let index = subpy_parser::parse_expression("x[1:2, 3]").unwrap();
        let ExprKind::Subscript { slice, .. } = &index.kind else {
            panic!("expected subscript");
        };
        assert!(is_extended_slice(slice));

        let plain = subpy_parser::parse_expression("x[1, 2]").unwrap();
        let ExprKind::Subscript { slice, .. } = &plain.kind else {
            panic!("expected subscript");
        };
        assert!(!is_extended_slice(slice));
    }

    #[test]
    fn test_numeric_kinds() {
        let kinds: Vec<_> = ["1", "1.0", "1j", "99999999999999999999999", "'a'"]
            .iter()
            .map(|s| numeric_kind(&subpy_parser::parse_expression(s).unwrap()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                Some(NumericKind::Integer),
                Some(NumericKind::Float),
                Some(NumericKind::Complex),
                Some(NumericKind::Integer),
                None,
            ]
        );
    }

    #[test]
    fn test_frames_closed_after_walk() {
        let unit = unit("class A:\n    def f(self):\n        def g():\n            pass\n");
        let mut walker = Walker::new(&unit, Detector::new(), None);
        walker.walk_module().unwrap();
        assert_eq!(walker.scope_depth(), 1);
        assert_eq!(walker.reports(), 2);
    }

    #[test]
    fn test_frames_closed_after_abort() {
        let src = "def outer():\n    class Inner:\n        def f(self):\n            return lambda: 1\n";
        let unit = unit(src);
        let allowed = FeatureSet::full() - Feature::Lambda;
        let mut walker = Walker::new(&unit, Validator::new(allowed), None);
        let err = walker.walk_module().unwrap_err();
        assert_eq!(err.violation().map(|v| v.feature), Some(Feature::Lambda));
        assert_eq!(walker.scope_depth(), 1);
    }

    #[test]
    fn test_allowed_features_are_not_reported() {
        let unit = unit("f = lambda *a: a\n");
        let checker = Checker::new(FeatureSet::from(Feature::Lambda));
        let mut walker = Walker::new(&unit, checker, None);
        walker.walk_module().unwrap();
        assert_eq!(walker.reports(), 1);
        assert_eq!(
            walker.reporter().result().features(),
            FeatureSet::from(Feature::VarArgs)
        );
    }

    #[test]
    fn test_slice_outside_subscript_is_unhandled() {
        let unit = unit("x = 1\n");
        let stray = Expr::new(
            ExprKind::Slice {
                lower: None,
                upper: None,
                step: None,
            },
            Span::new(4, 5),
        );
        let mut walker = Walker::new(&unit, Detector::new(), None);
        let err = walker.visit_expr(&stray).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::UnhandledConstruct {
                construct: "Slice",
                line: 1,
                column: 5
            }
        ));
    }

    #[test]
    fn test_slices_inside_subscripts_are_visited() {
        assert_eq!(detected("x[1:2]\n"), FeatureSet::EMPTY);
        assert_eq!(
            detected("x[lambda: 0:]\n"),
            FeatureSet::from(Feature::Lambda)
        );
        assert_eq!(
            detected("x[::2, 1]\n"),
            FeatureSet::from(Feature::FancyIndexing)
        );
    }

    #[test]
    fn test_closure_requires_function_frame() {
        assert!(detected("def f():\n    def g():\n        pass\n").contains(Feature::Closures));
        assert!(!detected("class A:\n    def f(self):\n        pass\n").contains(Feature::Closures));
        assert!(!detected("def f():\n    pass\ndef g():\n    pass\n").contains(Feature::Closures));
        assert!(!detected("def f():\n    g = lambda: 0\n").contains(Feature::Closures));
    }

    #[test]
    fn test_decorators_visit_in_enclosing_scope() {
        let src = "def f():\n    @deco(lambda: 0)\n    def g():\n        pass\n";
        let features = detected(src);
        assert!(features.contains(Feature::Decorators));
        assert!(features.contains(Feature::Lambda));
        assert!(features.contains(Feature::Closures));
    }
}
