//! Background jobs.
//!
//! A job owns its component outright: `spawn` moves the component into a
//! worker thread running the solver pipeline, and `join` blocks until the
//! worker hands it back.  If the OS refuses a thread the pipeline runs
//! inline on the caller — slower, but never wrong.
//!
//! The job also keeps a [`ComponentSave`] of its *input*, captured before
//! the worker starts.  That is what gets persisted for in-flight jobs:
//! saving never synchronises with the worker, and loading simply re-runs
//! the job from the captured input.

use std::thread;

use lf_core::{CargoId, Date};
use lf_graph::Component;
use lf_solver::run_pipeline;

use crate::saveload::ComponentSave;

enum JobState {
    Running(thread::JoinHandle<Component>),
    Finished(Component),
}

/// One run of the handler pipeline over one component.
pub struct Job {
    cargo: CargoId,
    join_date: Date,
    input: ComponentSave,
    state: JobState,
}

impl Job {
    /// Start the pipeline over `component`, preferably on a worker thread.
    pub fn spawn(component: Component, join_date: Date) -> Job {
        let cargo = component.cargo();
        let index = component.index();
        let input = ComponentSave::capture(&component);

        let state = match thread::Builder::new()
            .name(format!("linkflow-c{}-g{}", cargo.0, index.0))
            .spawn(move || run_pipeline(component))
        {
            Ok(handle) => JobState::Running(handle),
            Err(err) => {
                log::info!(
                    "worker thread for cargo {} unavailable ({err}); running job inline",
                    cargo.0
                );
                JobState::Finished(run_pipeline(input.restore(cargo)))
            }
        };

        Job { cargo, join_date, input, state }
    }

    pub fn cargo(&self) -> CargoId {
        self.cargo
    }

    /// The date at which the engine will join this job.
    pub fn join_date(&self) -> Date {
        self.join_date
    }

    pub fn is_due(&self, date: Date) -> bool {
        self.join_date <= date
    }

    /// The job's input snapshot, as captured at spawn time.
    pub fn input(&self) -> &ComponentSave {
        &self.input
    }

    /// Block until the pipeline is done and take the finished component.
    pub fn join(self) -> Component {
        match self.state {
            JobState::Finished(component) => component,
            JobState::Running(handle) => match handle.join() {
                Ok(component) => component,
                Err(payload) => std::panic::resume_unwind(payload),
            },
        }
    }
}
