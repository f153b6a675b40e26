//! Finalize-time launch gating.
//!
//! # State Machine
//! ```text
//! Armed ──set_run_on_exit(false)──▶ Disarmed
//!   │                                  │
//!   └──────────── finalize ────────────┴──▶ Fired | Skipped
//! ```
//!
//! The pipeline fires only if all of the following hold, checked in order:
//! - run-on-exit is set
//! - the host reported no error
//! - the process entry point is the invoking file, i.e. the framework was
//!   started from the application's own `main` and not pulled in as a
//!   library by some other program

use std::fmt;

use crate::bootstrap::Bootstrap;
use crate::error::BootstrapError;
use crate::observability::metrics;
use crate::pipeline::{MiddlewareBuilder, PipelineAssembler, Runner, RunnerFactory};
use crate::resolver::ClassLookup;

/// Why finalize did not launch the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// run-on-exit was turned off.
    Disarmed,
    /// The host finished with an error.
    ErrorPending,
    /// The entry point is not the invoking file.
    NotEntryPoint,
    /// Finalize already ran.
    AlreadyFinalized,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Disarmed => "disarmed",
            SkipReason::ErrorPending => "error_pending",
            SkipReason::NotEntryPoint => "not_entry_point",
            SkipReason::AlreadyFinalized => "already_finalized",
        }
    }
}

/// Outcome of finalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDecision {
    Fired,
    Skipped(SkipReason),
}

impl ExitDecision {
    pub fn fired(&self) -> bool {
        matches!(self, ExitDecision::Fired)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExitDecision::Fired => "fired",
            ExitDecision::Skipped(reason) => reason.as_str(),
        }
    }
}

impl fmt::Display for ExitDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Bootstrap {
    /// Check the launch conditions without launching.
    ///
    /// Later conditions are not evaluated once one fails, so the invoking
    /// file is not computed when disarmed or when an error is pending.
    pub fn exit_gate(&self, error_pending: bool) -> Result<(), SkipReason> {
        if !self.run_on_exit() {
            return Err(SkipReason::Disarmed);
        }
        if error_pending {
            return Err(SkipReason::ErrorPending);
        }
        if self.entry_point() != self.invoking_file() {
            return Err(SkipReason::NotEntryPoint);
        }
        Ok(())
    }

    /// Run the finalize step once.
    ///
    /// `pending` is the outcome of the host's own setup. An error in it is
    /// returned exactly as given and prevents launch. Otherwise `launch` is
    /// called when every gate passes; its error is returned as-is.
    pub fn finalize<E, F>(&self, pending: Result<(), E>, launch: F) -> Result<ExitDecision, E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        if !self.begin_finalize() {
            tracing::debug!("Finalize already ran; skipping");
            return pending.map(|()| ExitDecision::Skipped(SkipReason::AlreadyFinalized));
        }

        let decision = match self.exit_gate(pending.is_err()) {
            Ok(()) => ExitDecision::Fired,
            Err(reason) => ExitDecision::Skipped(reason),
        };
        metrics::record_exit_decision(&decision);

        match &decision {
            ExitDecision::Fired => tracing::debug!(
                invoking_file = %self.invoking_file().display(),
                "Finalize: launching pipeline"
            ),
            ExitDecision::Skipped(SkipReason::NotEntryPoint) => tracing::debug!(
                invoking_file = %self.invoking_file().display(),
                entry_point = %self.entry_point().display(),
                "Finalize: not started from the invoking file; skipping"
            ),
            ExitDecision::Skipped(reason) => tracing::debug!(reason = reason.as_str(), "Finalize: skipping"),
        }

        pending?;
        if decision.fired() {
            launch()?;
        }
        Ok(decision)
    }

    /// Finalize by assembling and launching the application's pipeline.
    pub fn finish<E, F, M>(
        &self,
        pending: Result<(), E>,
        lookup: &dyn ClassLookup,
        assembler: &PipelineAssembler<F, M>,
    ) -> Result<ExitDecision, E>
    where
        E: From<BootstrapError>,
        F: RunnerFactory,
        M: MiddlewareBuilder<Chain = <F::Runner as Runner>::Chain>,
    {
        self.finalize(pending, || assembler.run(self, lookup).map_err(E::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::StaticProcess;
    use crate::stack::StaticFrameSource;
    use std::cell::Cell;
    use std::sync::Arc;

    const APP_MAIN: &str = "/srv/api/src/main.rs:10:5:in api::main";

    fn bootstrap(frames: &[&str]) -> Bootstrap {
        Bootstrap::builder()
            .frame_source(StaticFrameSource::new(frames.iter().copied()))
            .process(Arc::new(StaticProcess::new("/usr/bin/api", "/srv/api")))
            .build()
    }

    fn finalize(boot: &Bootstrap, pending: Result<(), String>) -> (Result<ExitDecision, String>, u32) {
        let launches = Cell::new(0);
        let result = boot.finalize(pending, || {
            launches.set(launches.get() + 1);
            Ok(())
        });
        (result, launches.get())
    }

    #[test]
    fn test_fires_from_entry_point() {
        let boot = bootstrap(&[APP_MAIN]);
        let (result, launches) = finalize(&boot, Ok(()));
        assert_eq!(result, Ok(ExitDecision::Fired));
        assert_eq!(launches, 1);
    }

    #[test]
    fn test_disarmed_never_launches() {
        let boot = bootstrap(&[APP_MAIN]);
        boot.set_run_on_exit(false);
        let (result, launches) = finalize(&boot, Ok(()));
        assert_eq!(result, Ok(ExitDecision::Skipped(SkipReason::Disarmed)));
        assert_eq!(launches, 0);
    }

    #[test]
    fn test_pending_error_is_returned_untouched() {
        for armed in [true, false] {
            let boot = bootstrap(&[APP_MAIN]);
            boot.set_run_on_exit(armed);
            let (result, launches) = finalize(&boot, Err("bind failed".to_string()));
            assert_eq!(result, Err("bind failed".to_string()));
            assert_eq!(launches, 0);
        }
    }

    #[test]
    fn test_library_import_never_launches() {
        let boot = bootstrap(&[
            "/srv/api/src/routes.rs:4:9:in api::routes::install",
            "/srv/other/src/main.rs:7:5:in other::main",
        ]);
        assert_eq!(boot.exit_gate(false), Err(SkipReason::NotEntryPoint));
        let (result, launches) = finalize(&boot, Ok(()));
        assert_eq!(result, Ok(ExitDecision::Skipped(SkipReason::NotEntryPoint)));
        assert_eq!(launches, 0);
    }

    #[test]
    fn test_app_path_from_helper_fixes_invoking_file() {
        let boot = bootstrap(&["/srv/api/src/assets.rs:3:9:in api::assets::load", APP_MAIN]);
        assert_eq!(boot.app_path(["public"]), std::path::PathBuf::from("/srv/api/src/public"));

        let (result, launches) = finalize(&boot, Ok(()));
        assert_eq!(result, Ok(ExitDecision::Skipped(SkipReason::NotEntryPoint)));
        assert_eq!(launches, 0);
    }

    #[test]
    fn test_second_finalize_is_skipped() {
        let boot = bootstrap(&[APP_MAIN]);
        let (first, _) = finalize(&boot, Ok(()));
        let (second, launches) = finalize(&boot, Ok(()));
        assert_eq!(first, Ok(ExitDecision::Fired));
        assert_eq!(second, Ok(ExitDecision::Skipped(SkipReason::AlreadyFinalized)));
        assert_eq!(launches, 0);

        let (third, _) = finalize(&boot, Err("late".to_string()));
        assert_eq!(third, Err("late".to_string()));
    }

    #[test]
    fn test_launch_error_propagates() {
        let boot = bootstrap(&[APP_MAIN]);
        let result = boot.finalize(Ok(()), || Err("runner exploded".to_string()));
        assert_eq!(result, Err("runner exploded".to_string()));
    }

    #[test]
    fn test_no_stack_info_fires_for_executable() {
        let boot = bootstrap(&[]);
        assert_eq!(boot.exit_gate(false), Ok(()));
    }

    #[test]
    fn test_decision_labels() {
        assert_eq!(ExitDecision::Fired.to_string(), "fired");
        assert_eq!(ExitDecision::Skipped(SkipReason::NotEntryPoint).to_string(), "not_entry_point");
        assert!(!ExitDecision::Skipped(SkipReason::Disarmed).fired());
    }
}
