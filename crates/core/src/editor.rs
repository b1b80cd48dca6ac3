//! Single-writer editing session over one configuration.
//!
//! Every mutation builds a candidate and routes it through the validator, so `current` always
//! holds an accepted configuration. The preset undo slot is one level deep.

use serde::Serialize;
use tracing::info;

use crate::contrast::ContrastReport;
use crate::domain::bot::{BotConfiguration, Status};
use crate::domain::snippet::{self, Snippet};
use crate::embed::{self, EmbedArtifact, EmbedOptions};
use crate::errors::DomainError;
use crate::patch::ConfigPatch;
use crate::position::{self, PositionDirectives};
use crate::presets::{self, ThemeFields, ThemePreset};
use crate::validator;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Preview {
    pub position: PositionDirectives,
    pub embed: EmbedArtifact,
    pub contrast: ContrastReport,
}

#[derive(Clone, Debug)]
pub struct EditorSession {
    current: BotConfiguration,
    undo: Option<ThemeFields>,
}

impl EditorSession {
    /// Normalizes `config` before taking ownership of it.
    pub fn open(mut config: BotConfiguration) -> Result<Self, DomainError> {
        validator::normalize(&mut config)?;
        Ok(Self { current: config, undo: None })
    }

    pub fn current(&self) -> &BotConfiguration {
        &self.current
    }

    pub fn into_inner(self) -> BotConfiguration {
        self.current
    }

    pub fn can_revert(&self) -> bool {
        self.undo.is_some()
    }

    pub fn patch(&mut self, patch: ConfigPatch) -> Result<&BotConfiguration, DomainError> {
        self.current = validator::apply(&self.current, patch)?;
        Ok(&self.current)
    }

    pub fn apply_preset(&mut self, preset: ThemePreset) -> Result<&BotConfiguration, DomainError> {
        let (themed, snapshot) = presets::apply_preset(preset, &self.current);
        self.current = validator::accept(&self.current, themed)?;
        self.undo = Some(snapshot);
        info!(
            event_name = "editor.preset.applied",
            bot_id = %self.current.id,
            preset = preset.name(),
            "theme preset applied"
        );
        Ok(&self.current)
    }

    /// Restores the theme captured by the last `apply_preset`. Returns `false` when there is
    /// nothing to undo.
    pub fn revert_preset(&mut self) -> Result<bool, DomainError> {
        let Some(snapshot) = self.undo.take() else {
            return Ok(false);
        };

        let restored = presets::revert(&self.current, &snapshot);
        match validator::accept(&self.current, restored) {
            Ok(accepted) => {
                self.current = accepted;
                info!(
                    event_name = "editor.preset.reverted",
                    bot_id = %self.current.id,
                    "theme preset reverted"
                );
                Ok(true)
            }
            Err(error) => {
                self.undo = Some(snapshot);
                Err(error)
            }
        }
    }

    pub fn add_snippet(&mut self, snippet: Snippet) -> Result<&BotConfiguration, DomainError> {
        let mut candidate = self.current.clone();
        snippet::insert(&mut candidate.snippets, snippet)?;
        self.commit(candidate)
    }

    pub fn update_snippet(
        &mut self,
        id: &str,
        title: Option<String>,
        content: Option<String>,
    ) -> Result<&BotConfiguration, DomainError> {
        let mut candidate = self.current.clone();
        snippet::update(&mut candidate.snippets, id, title, content)?;
        self.commit(candidate)
    }

    pub fn remove_snippet(&mut self, id: &str) -> Result<Snippet, DomainError> {
        let mut candidate = self.current.clone();
        let removed = snippet::remove(&mut candidate.snippets, id)?;
        self.commit(candidate)?;
        Ok(removed)
    }

    pub fn move_snippet(
        &mut self,
        id: &str,
        target: usize,
    ) -> Result<&BotConfiguration, DomainError> {
        let mut candidate = self.current.clone();
        snippet::move_to(&mut candidate.snippets, id, target)?;
        self.commit(candidate)
    }

    pub fn publish(&mut self) -> Result<&BotConfiguration, DomainError> {
        self.patch(ConfigPatch::status(Status::Live))
    }

    pub fn unpublish(&mut self) -> Result<&BotConfiguration, DomainError> {
        self.patch(ConfigPatch::status(Status::Draft))
    }

    pub fn preview(&self, options: &EmbedOptions) -> Preview {
        Preview {
            position: position::resolve(&self.current.position),
            embed: embed::compile(&self.current, options),
            contrast: ContrastReport::for_appearance(&self.current.appearance),
        }
    }

    fn commit(&mut self, candidate: BotConfiguration) -> Result<&BotConfiguration, DomainError> {
        self.current = validator::accept(&self.current, candidate)?;
        Ok(&self.current)
    }
}
