// Coordinator - one task owns the dashboard and serializes every mutation
use crate::application::dashboard_service::DashboardService;
use crate::application::scheduler::{Scheduler, Timer, TimerId};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

type Job<S> = Box<dyn FnOnce(&mut DashboardService<S>) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("dashboard coordinator has shut down")]
pub struct CoordinatorClosed;

pub struct CoordinatorHandle<S: Scheduler> {
    jobs: mpsc::Sender<Job<S>>,
}

impl<S: Scheduler> Clone for CoordinatorHandle<S> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
        }
    }
}

impl<S: Scheduler + 'static> CoordinatorHandle<S> {
    /// Runs `f` against the dashboard on the coordinator task and returns its result.
    pub async fn call<R, F>(&self, f: F) -> Result<R, CoordinatorClosed>
    where
        F: FnOnce(&mut DashboardService<S>) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job<S> = Box::new(move |service| {
            let _ = tx.send(f(service));
        });
        self.jobs.send(job).await.map_err(|_| CoordinatorClosed)?;
        rx.await.map_err(|_| CoordinatorClosed)
    }
}

/// Moves the service onto its own task. Timer expiries from `fired` are
/// interleaved with caller jobs; the task stops, cancelling every pending
/// timer, once all handles are dropped.
pub fn spawn<S: Scheduler + 'static>(
    mut service: DashboardService<S>,
    mut fired: mpsc::UnboundedReceiver<(TimerId, Timer)>,
    buffer: usize,
) -> (CoordinatorHandle<S>, JoinHandle<()>) {
    let (jobs_tx, mut jobs) = mpsc::channel::<Job<S>>(buffer.max(1));

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                job = jobs.recv() => match job {
                    Some(job) => job(&mut service),
                    None => break,
                },
                Some((id, timer)) = fired.recv() => service.on_timer(id, timer),
            }
        }
        let cancelled = service.teardown();
        tracing::info!("Dashboard coordinator stopped, cancelled {} timers", cancelled);
    });

    (CoordinatorHandle { jobs: jobs_tx }, task)
}
