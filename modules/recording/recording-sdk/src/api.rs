use std::time::Instant;

use async_trait::async_trait;
use modkit::{SecurityCtx, ServiceKind, ServiceName};

use crate::errors::MedicalError;
use crate::models::{AudioFile, ProcessedReport, Report, ReportOptions, Transcription};

#[async_trait]
pub trait MedicalApi: Send + Sync {
    async fn transcribe_audio(
        &self,
        ctx: &SecurityCtx,
        audio: AudioFile,
    ) -> Result<Transcription, MedicalError>;

    async fn generate_report(
        &self,
        ctx: &SecurityCtx,
        transcription: &Transcription,
        options: ReportOptions,
    ) -> Result<Report, MedicalError>;

    /// Transcribe `audio`, then generate a report from the result.
    ///
    /// Stops at the first failing stage.
    async fn process_audio_and_generate_report(
        &self,
        ctx: &SecurityCtx,
        audio: AudioFile,
        options: ReportOptions,
    ) -> Result<ProcessedReport, MedicalError> {
        let started = Instant::now();
        let transcription = self.transcribe_audio(ctx, audio).await?;
        let transcription_time = started.elapsed();

        let started = Instant::now();
        let report = self.generate_report(ctx, &transcription, options).await?;
        let report_time = started.elapsed();

        tracing::info!(
            transcription_ms = transcription_time.as_millis(),
            report_ms = report_time.as_millis(),
            "audio processed"
        );

        Ok(ProcessedReport {
            transcription,
            report,
            transcription_time,
            report_time,
        })
    }
}

pub struct MedicalApiService;

impl ServiceKind for MedicalApiService {
    const NAME: ServiceName = ServiceName::MedicalApi;
    type Api = dyn MedicalApi;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    #[derive(Default)]
    struct Scripted {
        fail_transcription: bool,
        report_calls: AtomicUsize,
    }

    #[async_trait]
    impl MedicalApi for Scripted {
        async fn transcribe_audio(
            &self,
            _ctx: &SecurityCtx,
            audio: AudioFile,
        ) -> Result<Transcription, MedicalError> {
            if self.fail_transcription {
                return Err(MedicalError::Upstream {
                    status: 502,
                    message: "bad gateway".to_owned(),
                });
            }
            Ok(Transcription::new(format!("{} bytes", audio.bytes.len())))
        }

        async fn generate_report(
            &self,
            _ctx: &SecurityCtx,
            transcription: &Transcription,
            options: ReportOptions,
        ) -> Result<Report, MedicalError> {
            self.report_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Report {
                content: format!("report of {}", transcription.text),
                template: options.template,
            })
        }
    }

    fn ctx() -> SecurityCtx {
        SecurityCtx::new(Uuid::new_v4(), "doc@example.com")
    }

    #[tokio::test]
    async fn runs_both_stages_in_order() {
        let api = Scripted::default();
        let audio = AudioFile::new("visit.webm", "audio/webm", vec![0_u8; 4]);

        let out = api
            .process_audio_and_generate_report(&ctx(), audio, ReportOptions::default().template("soap"))
            .await
            .unwrap();

        assert_eq!(out.transcription.text, "4 bytes");
        assert_eq!(out.report.content, "report of 4 bytes");
        assert_eq!(out.report.template.as_deref(), Some("soap"));
    }

    #[tokio::test]
    async fn transcription_failure_skips_report() {
        let api = Scripted {
            fail_transcription: true,
            ..Scripted::default()
        };
        let audio = AudioFile::new("visit.webm", "audio/webm", Vec::new());

        let err = api
            .process_audio_and_generate_report(&ctx(), audio, ReportOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, MedicalError::Upstream { status: 502, .. }));
        assert_eq!(api.report_calls.load(Ordering::SeqCst), 0);
    }
}
