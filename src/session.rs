//! Persistence bookkeeping around an [`Editor`]: cache mirroring, save/export
//! payloads and the presentation id assigned by the backend.

use log::{debug, error, info};

use crate::cache::{mirror_deck, resolve_initial_deck, DeckCache, DeckSource, NavigationState};
use crate::client::{
    ExportPayload, ExportedDocument, PresentationClient, SavePayload, SaveResponse, TemplateRef,
};
use crate::config::EditorConfig;
use crate::editor::{Command, CommandOutcome, Editor, UploadBatch, UploadTicket};
use crate::errors::Result;
use crate::models::{
    common::ElementId,
    deck::Deck,
    template::{TemplateDescriptor, TemplateKind},
};

pub struct EditorSession<C: DeckCache> {
    editor: Editor,
    cache: C,
    config: EditorConfig,
    presentation_id: Option<String>,
    saved: Option<Deck>,
}

impl<C: DeckCache> EditorSession<C> {
    pub fn new(editor: Editor, cache: C, config: EditorConfig) -> Self {
        EditorSession {
            editor,
            cache,
            config,
            presentation_id: None,
            saved: None,
        }
    }

    /// Opens the deck picked by the load precedence rule and mirrors it into the cache.
    pub fn open(
        navigation: Option<&NavigationState>,
        cache: C,
        config: EditorConfig,
        template: Option<TemplateDescriptor>,
    ) -> (Self, DeckSource) {
        let resolver = config.layout_resolver();
        let styled = template.as_ref().map(|t| resolver.styled_template(t));
        let cached = cache.load();
        let (deck, source) = resolve_initial_deck(navigation, cached.as_deref(), styled.as_ref());
        info!("Opened deck with {} slide(s) from {:?}", deck.len(), source);
        let editor = Editor::with_resolver(deck, template, resolver);
        let mut session = EditorSession::new(editor, cache, config);
        session.mirror();
        (session, source)
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn presentation_id(&self) -> Option<&str> {
        self.presentation_id.as_deref()
    }

    /// Applies a command and mirrors the deck into the cache when it changed.
    pub fn apply(&mut self, command: Command) -> CommandOutcome {
        let outcome = self.editor.apply(command);
        if outcome.changed() {
            self.mirror();
        }
        outcome
    }

    /// Appends a finished upload batch and mirrors the deck.
    pub fn apply_upload(&mut self, ticket: &UploadTicket, batch: UploadBatch) -> Result<Vec<ElementId>> {
        let ids = self.editor.apply_upload(ticket, batch)?;
        if !ids.is_empty() {
            self.mirror();
        }
        Ok(ids)
    }

    fn mirror(&mut self) {
        if let Err(e) = mirror_deck(&mut self.cache, self.editor.deck()) {
            error!("Failed to mirror deck into cache: {}", e);
        }
    }

    pub fn save_payload(&self) -> SavePayload {
        SavePayload {
            slides: self.editor.deck().prepared_for_save(),
            template_id: self.editor.template_id().map(str::to_string),
            presentation_type: self.config.presentation_type.clone(),
            user_id: self.config.user_id.clone(),
            presentation_id: self.presentation_id.clone(),
        }
    }

    /// Keeps the id the backend assigned and remembers what was saved.
    ///
    /// Responses are taken as they arrive; a late response overwrites a newer one.
    pub fn record_saved(&mut self, response: SaveResponse, sent: Deck) {
        debug!("Recorded save of presentation {}", response.presentation_id);
        self.presentation_id = Some(response.presentation_id);
        self.saved = Some(sent);
    }

    /// Custom templates travel as full descriptors, built-in ones by id.
    pub fn export_payload(&self) -> ExportPayload {
        let template = self.editor.template().map(|t| match t.kind {
            TemplateKind::Custom => TemplateRef::Descriptor(t.clone()),
            TemplateKind::Builtin => TemplateRef::Id(t.id.clone()),
        });
        ExportPayload {
            slides: self.editor.deck().prepared_for_save(),
            template,
            presentation_type: self.config.presentation_type.clone(),
        }
    }

    /// True when the deck differs from the last saved one (or was edited and never saved).
    pub fn has_unsaved_changes(&self) -> bool {
        let Some(saved) = &self.saved else {
            return self.editor.revision() > 0;
        };
        let current = self.editor.deck().prepared_for_save();
        #[cfg(feature = "diff")]
        {
            match crate::diff::ComparerBuilder::new()
                .set_base(saved.clone())
                .build()
                .and_then(|c| c.compare(&current))
            {
                Ok(result) => result.has_changes(),
                Err(e) => {
                    error!("Deck comparison failed: {}", e);
                    saved != &current
                }
            }
        }
        #[cfg(not(feature = "diff"))]
        {
            saved != &current
        }
    }

    /// Readable description of the edits since the last save.
    #[cfg(feature = "diff")]
    pub fn unsaved_summary(&self) -> Option<String> {
        let saved = self.saved.as_ref()?;
        let result = crate::diff::ComparerBuilder::new()
            .set_base(saved.clone())
            .set_simplify(true)
            .build()
            .and_then(|c| c.compare(&self.editor.deck().prepared_for_save()))
            .ok()?;
        result.get_readable_diff().ok()
    }

    /// Saves through `client`. On failure the deck is left as it is so the user can retry.
    ///
    /// Holds the session for the whole request. While the editor must stay interactive,
    /// take [`save_payload`](Self::save_payload), send it with
    /// [`PresentationClient::save`] while commands keep flowing through
    /// [`apply`](Self::apply), then hand the response to
    /// [`record_saved`](Self::record_saved) with the payload's slides.
    pub async fn save(&mut self, client: &PresentationClient) -> Result<String> {
        let payload = self.save_payload();
        match client.save(&payload).await {
            Ok(response) => {
                let id = response.presentation_id.clone();
                self.record_saved(response, payload.slides);
                Ok(id)
            }
            Err(e) => {
                error!("Save failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn export(&self, client: &PresentationClient) -> Result<ExportedDocument> {
        client.export(&self.export_payload()).await.map_err(|e| {
            error!("Export failed: {}", e);
            e
        })
    }

    pub fn into_editor(self) -> Editor {
        self.editor
    }
}
