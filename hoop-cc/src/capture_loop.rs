//! Capture loop
//!
//! One task drives everything: a sampling interval feeds the recorder, and at
//! most one submission is in flight. New recordings are gated on that
//! submission resolving. Sampling never waits on the network.

use std::future::Future;
use std::pin::Pin;

use tokio::time::{interval, sleep_until, Instant, MissedTickBehavior};

use hoop_common::api::AnalysisOutcome;

use crate::error::{FlowError, SubmitError};
use crate::flow::AssessmentFlow;
use crate::recorder::{CaptureDevice, FrameSource, MotionRecorder, TickOutcome};

type InFlight = Pin<Box<dyn Future<Output = Result<AnalysisOutcome, SubmitError>> + Send>>;

/// Why the loop stopped
#[derive(Debug)]
pub enum LoopExit {
    /// Session saturated; the final assessment is in the outcome
    Complete(AnalysisOutcome),
    /// Shutdown was requested
    Shutdown,
}

pub struct CaptureLoop<S: FrameSource, D: CaptureDevice> {
    frames: S,
    recorder: MotionRecorder<D>,
    flow: AssessmentFlow,
}

impl<S: FrameSource, D: CaptureDevice> CaptureLoop<S, D> {
    pub fn new(frames: S, recorder: MotionRecorder<D>, flow: AssessmentFlow) -> Self {
        Self {
            frames,
            recorder,
            flow,
        }
    }

    pub fn flow(&self) -> &AssessmentFlow {
        &self.flow
    }

    pub fn into_flow(self) -> AssessmentFlow {
        self.flow
    }

    /// Run until the session saturates, `shutdown` resolves, or capture fails.
    ///
    /// Submission failures do not end the loop: the flow shows the error,
    /// waits out the reset delay, then resumes the same session. A session
    /// the server reports as full or deleted was already forgotten by the
    /// flow, so the loop continues on a fresh one.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<LoopExit, FlowError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        self.flow.enter()?;
        self.recorder.arm();

        let mut ticker = interval(self.recorder.config().sample_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight: Option<InFlight> = None;
        let mut reset_at: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    self.recorder.disarm();
                    tracing::info!("Capture loop stopped");
                    return Ok(LoopExit::Shutdown);
                }

                result = async {
                    match in_flight.as_mut() {
                        Some(submission) => submission.await,
                        None => std::future::pending().await,
                    }
                }, if in_flight.is_some() => {
                    in_flight = None;
                    match self.flow.complete(result) {
                        Ok(outcome) if outcome.is_saturated() => {
                            self.recorder.disarm();
                            return Ok(LoopExit::Complete(outcome));
                        }
                        Ok(_) => {}
                        Err(_) => {
                            // In-flight clip is discarded; only what the server committed survives
                            self.recorder.disarm();
                            reset_at = Some(Instant::now() + self.flow.reset_delay());
                        }
                    }
                }

                _ = sleep_until(reset_at.unwrap_or_else(Instant::now)), if reset_at.is_some() => {
                    reset_at = None;
                    self.flow.reset();
                    self.flow.enter()?;
                    self.recorder.arm();
                    tracing::info!("Flow reset after failure");
                }

                now = ticker.tick() => {
                    if let Err(err) = self.sample(now.into_std(), &mut in_flight) {
                        self.recorder.disarm();
                        self.flow.fail(&err);
                        return Err(err);
                    }
                }
            }
        }
    }

    fn sample(
        &mut self,
        now: std::time::Instant,
        in_flight: &mut Option<InFlight>,
    ) -> Result<(), FlowError> {
        let frame = self.frames.next_frame()?;

        match self.recorder.tick(now, frame, in_flight.is_none())? {
            TickOutcome::Started => self.flow.recording_started(),
            TickOutcome::Finished(clip) => {
                let pending = self.flow.prepare(clip.bytes)?;
                *in_flight = Some(Box::pin(pending.run()));
            }
            TickOutcome::Idle
            | TickOutcome::Armed { .. }
            | TickOutcome::Recording
            | TickOutcome::CoolingDown => {}
        }
        Ok(())
    }
}
