//! Generator invocation and failure packaging.
//!
//! The plugin call is the single recovery boundary of the pipeline: anything
//! the plugin raises, by error or by panic, becomes a diagnostic artifact.
//! Nothing earlier in the pipeline is caught.

use crate::generator::artifact::{GeneratedArtifact, GeneratedFile};
use crate::generator::context::InvocationContext;
use crate::generator::registry::Generator;
use crate::model::{ResolvedModel, Subject};
use std::any::Any;
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{error, info};

pub const ERROR_LOG_FILE_NAME: &str = "generation_error.log";
pub const ERROR_LOG_FOLDER: &str = "/generated";

/// Builds the artifact returned in place of a failed generation.
pub struct ResultPackager;

impl ResultPackager {
    /// One-entry artifact holding the failure trace, tagged with the key the
    /// caller asked for.
    pub fn package(subject: Subject, generator_key: &str, failure_detail: &str) -> GeneratedArtifact {
        GeneratedArtifact::new(generator_key, subject).with_file(GeneratedFile::new(
            ERROR_LOG_FILE_NAME,
            ERROR_LOG_FOLDER,
            failure_detail,
        ))
    }
}

/// Runs a plugin against one model and context.
pub struct GeneratorInvoker;

impl GeneratorInvoker {
    /// Invoke `generator`. Always yields an artifact: the plugin's own on
    /// success, a packaged failure otherwise.
    pub async fn invoke(
        generator: &Generator,
        model: ResolvedModel,
        context: InvocationContext,
    ) -> GeneratedArtifact {
        let subject = model.subject();
        let key = generator.key.clone();
        let instance = Arc::clone(&generator.instance);

        let outcome = tokio::task::spawn_blocking(move || instance.generate(&model, &context)).await;

        let failure_detail = match outcome {
            Ok(Ok(artifact)) => {
                info!(
                    generator = %key,
                    subject = %subject,
                    files = artifact.files().len(),
                    "Generation succeeded"
                );
                return artifact;
            }
            Ok(Err(err)) => format!("{:?}", err),
            Err(join_error) => describe_join_error(&key, join_error),
        };

        error!(
            generator = %key,
            subject = %subject,
            detail = %failure_detail,
            "Generation failed, returning diagnostic artifact"
        );
        ResultPackager::package(subject, &key, &failure_detail)
    }
}

fn describe_join_error(key: &str, join_error: JoinError) -> String {
    if join_error.is_panic() {
        format!(
            "Generator {} panicked: {}",
            key,
            panic_message(&*join_error.into_panic())
        )
    } else {
        format!("Generator {} task did not complete: {}", key, join_error)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
