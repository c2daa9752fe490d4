//! Backend actor - runs backend commands off the App actor's loop

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::backend::Backend;
use crate::messages::{BackendCommand, BackendResponse};

/// Backend actor that spawns one task per command and reports back on `response_tx`
pub struct BackendActor {
    backend: Arc<dyn Backend>,
    response_tx: mpsc::UnboundedSender<BackendResponse>,
    active_commands: JoinSet<()>,
}

impl BackendActor {
    pub fn new(backend: Arc<dyn Backend>, response_tx: mpsc::UnboundedSender<BackendResponse>) -> Self {
        BackendActor {
            backend,
            response_tx,
            active_commands: JoinSet::new(),
        }
    }

    /// Run the backend actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(BackendCommand::Shutdown) | None => break,
                        Some(command) => {
                            let backend = Arc::clone(&self.backend);
                            let response_tx = self.response_tx.clone();

                            self.active_commands.spawn(async move {
                                let name = command.name();
                                tracing::info!(command = name, "Running backend command");
                                execute(backend.as_ref(), command, &response_tx).await;
                                tracing::debug!(command = name, "Backend command finished");
                            });
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_commands.join_next() => {}
            }
        }
    }
}

/// Run one command to completion, sending progress and the final response
pub async fn execute(
    backend: &dyn Backend,
    command: BackendCommand,
    response_tx: &mpsc::UnboundedSender<BackendResponse>,
) {
    let response = match command {
        BackendCommand::ListInstallations => {
            BackendResponse::Installations(backend.list_installations().await)
        }
        BackendCommand::ListPresets { force_refresh } => {
            BackendResponse::Presets(backend.list_presets(force_refresh).await)
        }
        BackendCommand::ClearCache => BackendResponse::CacheCleared(backend.clear_cache().await),
        BackendCommand::InstallPreset {
            preset_id,
            install_paths,
        } => {
            let mut result = Ok(());
            for install_path in install_paths {
                if let Err(err) = backend.install_preset(&preset_id, &install_path).await {
                    result = Err(err);
                    break;
                }
                tracing::info!(preset_id = %preset_id, install_path = %install_path, "Preset installed");
                let _ = response_tx.send(BackendResponse::PresetInstalled { install_path });
            }
            BackendResponse::InstallFinished(result)
        }
        BackendCommand::ValidateInstallationPath(path) => {
            let result = backend.validate_installation_path(&path).await;
            BackendResponse::PathValidated { path, result }
        }
        BackendCommand::DownloadCreatorSettings(request) => {
            let result = backend.download_creator_settings(&request).await;
            BackendResponse::CreatorSettingsInstalled {
                preset_name: request.preset_name,
                result,
            }
        }
        BackendCommand::UploadMaterialFile(source_path) => {
            BackendResponse::MaterialUploaded(backend.upload_material_file(&source_path).await)
        }
        BackendCommand::InstallUploadedMaterials {
            selected_names,
            preset_name,
        } => {
            let result = backend
                .install_uploaded_materials(&selected_names, &preset_name)
                .await;
            BackendResponse::MaterialsInstalled {
                preset_name,
                result,
            }
        }
        BackendCommand::Shutdown => return,
    };

    let _ = response_tx.send(response);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::mock::{Call, MockBackend};

    async fn collect(backend: &MockBackend, command: BackendCommand) -> Vec<BackendResponse> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        execute(backend, command, &tx).await;
        drop(tx);
        let mut responses = Vec::new();
        while let Some(response) = rx.recv().await {
            responses.push(response);
        }
        responses
    }

    #[tokio::test]
    async fn test_install_reports_each_target_then_finishes() {
        let backend = MockBackend::new().failing_install_at("/c", "disk full");
        let responses = collect(
            &backend,
            BackendCommand::InstallPreset {
                preset_id: "p".to_string(),
                install_paths: vec!["/a".into(), "/b".into(), "/c".into(), "/d".into()],
            },
        )
        .await;

        assert_eq!(responses.len(), 3);
        assert!(matches!(
            &responses[1],
            BackendResponse::PresetInstalled { install_path } if install_path == "/b"
        ));
        assert!(matches!(&responses[2], BackendResponse::InstallFinished(Err(_))));
        assert_eq!(backend.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_actor_runs_commands_until_shutdown() {
        let backend = Arc::new(MockBackend::new());
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(BackendActor::new(backend.clone(), resp_tx).run(cmd_rx));

        cmd_tx.send(BackendCommand::ClearCache).unwrap();
        let response = resp_rx.recv().await.unwrap();
        assert!(matches!(response, BackendResponse::CacheCleared(Ok(()))));

        cmd_tx.send(BackendCommand::Shutdown).unwrap();
        handle.await.unwrap();
        assert_eq!(backend.calls(), vec![Call::ClearCache]);
    }
}
