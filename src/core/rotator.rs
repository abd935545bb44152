//! Rotation orchestrator.
//!
//! Runs jobs strictly in order: one source read, then every sink in declared
//! order, then every credential key. Failures are recorded and the run moves
//! on; only cancellation stops it early.

use tracing::{debug, info, info_span, warn};

use crate::core::sink::Sink;
use crate::core::{Context, CredentialSet, RotationJob};
use crate::error::{Failure, RotationErrors};

/// Rotate every job and publish fresh values to its sinks.
///
/// # Errors
///
/// Returns every failure recorded across all jobs, each tagged with the job
/// name and, where it applies, the sink kind and credential key.
pub fn rotate_secrets(ctx: &Context, jobs: &[RotationJob]) -> Result<(), RotationErrors> {
    let mut errors = RotationErrors::default();

    for job in jobs {
        let _span = info_span!("job", job = %job.name).entered();

        if ctx.is_done() {
            errors.push(Failure::Cancelled {
                job: job.name.clone(),
            });
            break;
        }

        let credentials = match job.source.read(ctx) {
            Ok(Some(credentials)) => credentials,
            Ok(None) => {
                info!(source = %job.source.kind(), "source not due for rotation");
                continue;
            }
            Err(e) => {
                warn!(source = %job.source.kind(), error = %e, "source read failed");
                errors.push(Failure::Source {
                    job: job.name.clone(),
                    kind: job.source.kind(),
                    source: e,
                });
                continue;
            }
        };
        debug!(keys = credentials.len(), "source produced credentials");

        if !publish(ctx, &job.name, &credentials, &job.sinks, &mut errors) {
            break;
        }
    }

    errors.into_result()
}

/// Write `credentials` to each sink. Returns false if the run was cancelled.
fn publish(
    ctx: &Context,
    job: &str,
    credentials: &CredentialSet,
    sinks: &[Box<dyn Sink>],
    errors: &mut RotationErrors,
) -> bool {
    for sink in sinks {
        let key_to_name = sink.key_to_name();
        if key_to_name.is_empty() {
            errors.push(Failure::MissingMapping {
                job: job.to_string(),
                sink: sink.kind(),
            });
            continue;
        }

        for (key, value) in credentials.iter() {
            let Some(name) = key_to_name.get(key) else {
                errors.push(Failure::MissingName {
                    job: job.to_string(),
                    key: key.to_string(),
                    sink: sink.kind(),
                });
                continue;
            };

            if ctx.is_done() {
                errors.push(Failure::Cancelled {
                    job: job.to_string(),
                });
                return false;
            }

            match sink.write(ctx, name, value) {
                Ok(()) => debug!(sink = %sink.kind(), key = %key, "credential written"),
                Err(e) => {
                    warn!(sink = %sink.kind(), key = %key, error = %e, "sink write failed");
                    errors.push(Failure::Sink {
                        job: job.to_string(),
                        key: key.to_string(),
                        sink: sink.kind(),
                        source: e,
                    });
                }
            }
        }
    }
    true
}
