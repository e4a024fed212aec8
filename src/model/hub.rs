// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::error::AppError;
use hf_hub::{Repo, RepoType, api::sync::Api, api::sync::ApiRepo};
use std::path::{Path, PathBuf};

/// Where model files come from: a local directory or a pinned Hub revision.
pub enum ModelRepo {
    Local(PathBuf),
    Hub { repo_id: String, repo: ApiRepo },
}

impl ModelRepo {
    /// Prefers `local_dir` when it is an existing directory, otherwise opens
    /// `repo_id` at `revision` on the Hugging Face Hub.
    pub fn resolve(
        repo_id: &str,
        revision: &str,
        local_dir: Option<&Path>,
    ) -> Result<Self, AppError> {
        if let Some(dir) = local_dir {
            if dir.is_dir() {
                tracing::info!("Loading model files from local path: {:?}", dir);
                return Ok(ModelRepo::Local(dir.to_path_buf()));
            }
            tracing::warn!(
                "Model path {:?} is not a directory, using HuggingFace Hub repo {}",
                dir,
                repo_id
            );
        }

        Self::hub(repo_id, revision)
    }

    pub fn hub(repo_id: &str, revision: &str) -> Result<Self, AppError> {
        tracing::info!(
            "Downloading/Loading model from HuggingFace Hub: {} ({})",
            repo_id,
            revision
        );
        let api = Api::new().map_err(|e| AppError::ModelLoadError(e.to_string()))?;
        let repo = api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));
        Ok(ModelRepo::Hub {
            repo_id: repo_id.to_string(),
            repo,
        })
    }

    pub fn get(&self, filename: &str) -> Result<PathBuf, AppError> {
        match self {
            ModelRepo::Local(dir) => {
                let path = dir.join(filename);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(AppError::ModelLoadError(format!(
                        "Missing model file: {}",
                        path.display()
                    )))
                }
            }
            ModelRepo::Hub { repo_id, repo } => repo.get(filename).map_err(|e| {
                AppError::ModelLoadError(format!("Failed to fetch {} from {}: {}", filename, repo_id, e))
            }),
        }
    }

    /// Like [`get`](Self::get) but treats an absent file as `None`.
    pub fn get_optional(&self, filename: &str) -> Option<PathBuf> {
        match self.get(filename) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!("Optional model file unavailable: {}", e);
                None
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ModelRepo::Local(dir) => dir.display().to_string(),
            ModelRepo::Hub { repo_id, .. } => repo_id.clone(),
        }
    }
}
