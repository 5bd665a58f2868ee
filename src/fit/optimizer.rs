//! Solver construction and execution for log-likelihood maximization.
//!
//! Purpose
//! -------
//! Wire a [`LogLikelihood`] model into an L-BFGS run: build the solver for
//! the configured line search, apply tolerances, execute, and normalize
//! the raw solver state into an [`OptimOutcome`]. This is the single entry
//! point the trend estimator calls per replicate.
//!
//! Conventions
//! -----------
//! - The builders leave `theta0` and `max_iters` to the executor stage.
//! - Solver errors never leak as `argmin::core::Error`; everything crosses
//!   this module's boundary as a typed [`FitError`].
//! - With the `obs_slog` feature and `opts.verbose`, a terminal slog
//!   observer is attached to the run.
use crate::fit::{
    adapter::ArgminAdapter,
    errors::FitResult,
    traits::{FitOptions, LineSearcher, LogLikelihood, OptimOutcome},
    types::{
        Cost, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente, MoreThuenteLS, Theta,
        DEFAULT_LBFGS_MEM,
    },
};
use argmin::core::{Executor, State};
use argmin::solver::quasinewton::LBFGS;

/// Maximize `ℓ(θ)` with L-BFGS and the configured line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data)` in an [`ArgminAdapter`] minimizing `c(θ) = -ℓ(θ)`.
/// - Builds the solver per `opts.line_searcher` and runs it.
///
/// # Errors
/// Propagates `check` failures, builder errors for invalid tolerances, and
/// hard solver errors (e.g. line-search breakdown) as [`FitError`]s.
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &FitOptions,
) -> FitResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgminAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}

/// Construct L-BFGS with More–Thuente line search and crate tolerances.
fn build_more_thuente(opts: &FitOptions) -> FitResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsMoreThuente::new(MoreThuenteLS::new(), mem), opts)
}

/// Construct L-BFGS with Hager–Zhang line search and crate tolerances.
fn build_hager_zhang(opts: &FitOptions) -> FitResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    configure_lbfgs(LbfgsHagerZhang::new(HagerZhangLS::new(), mem), opts)
}

/// Apply optional gradient and cost-change tolerances to a solver.
fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &FitOptions,
) -> FitResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(tol) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(tol)?;
    }
    if let Some(tol) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(tol)?;
    }
    Ok(solver)
}

/// Run a constructed solver and normalize its state into [`OptimOutcome`].
fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &FitOptions, problem: ArgminAdapter<'a, F>, solver: S,
) -> FitResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgminAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + Send
        + 'static,
{
    let mut executor = Executor::new(problem, solver);
    executor = executor.configure(|state| state.param(theta0));
    if let Some(max_iter) = opts.tols.max_iter {
        executor = executor.configure(|state| state.max_iters(max_iter as u64));
    }
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        executor = executor.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    #[cfg(not(feature = "obs_slog"))]
    let _ = opts.verbose;

    let mut state = executor.run()?.state().clone();
    let iterations = state.get_iter();
    let termination = state.get_termination_status().clone();
    let grad = state.take_gradient();
    OptimOutcome::new(state.take_best_param(), -state.get_best_cost(), termination, iterations, grad)
}
