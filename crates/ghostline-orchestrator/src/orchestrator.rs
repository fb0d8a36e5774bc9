//! `WorkflowOrchestrator` (spec §4.11): `START → ingest → embed →
//! generate_outline → request_approval → wait_for_approval → [chapter
//! loop] → safety_check → finalize → complete → END`, with
//! `wait_for_approval` as the sole interrupt point.

use std::sync::Arc;

use ghostline_agents::roles::analyze_voice;
use ghostline_agents::Agent;
use ghostline_core::config::GhostlineConfig;
use ghostline_core::cost_context::CostContext;
use ghostline_core::model::{
    CanonBlock, Chapter, Outline, OutlineChapter, Phase, SourceChunk, Stylometry, VoiceProfile,
    WorkflowState,
};
use ghostline_chapter::{run_chapter_subgraph, ChapterAgents, ChapterState, GroundingThresholds};
use ghostline_embed::Embedder;
use ghostline_outline::{run_outline_subgraph, OutlineState};
use ghostline_retrieval::{retrieve, ChunkStore};
use ghostline_safety::check_content;
use ghostline_voice::extract_features;
use serde_json::json;
use tracing::warn;

use crate::checkpoint::CheckpointSaver;
use crate::errors::{OrchestratorError, OrchestratorResult};

/// One per role, bundled so the orchestrator only needs a single
/// injected value instead of seven (spec §4.5's seven roles applied to
/// the book-generation pipeline).
pub struct WorkflowAgents {
    pub outline_planner: Agent,
    pub outline_critic: Agent,
    pub content_drafter: Agent,
    pub voice_editor: Agent,
    pub fact_checker: Agent,
    pub cohesion_analyst: Agent,
    pub voice_analyst: Agent,
}

/// Pre-extracted document content (spec §6 DocumentExtractor contract:
/// `extract() → {content, chunks[], ...}`). Extraction itself is an
/// external collaborator; the orchestrator only consumes its output.
pub struct IngestedSource {
    pub source_material_id: String,
    pub filename: String,
    pub chunks: Vec<String>,
}

fn naive_summary(chunks: &[String]) -> String {
    let joined = chunks.join(" ");
    let mut words = joined.split_whitespace();
    let preview: Vec<&str> = (&mut words).take(60).collect();
    preview.join(" ")
}

pub struct WorkflowOrchestrator {
    store: Arc<dyn ChunkStore>,
    embedder: Embedder,
    agents: WorkflowAgents,
    checkpoints: Arc<dyn CheckpointSaver>,
    config: GhostlineConfig,
}

impl WorkflowOrchestrator {
    pub fn new(
        store: Arc<dyn ChunkStore>,
        embedder: Embedder,
        agents: WorkflowAgents,
        checkpoints: Arc<dyn CheckpointSaver>,
        config: GhostlineConfig,
    ) -> Self {
        Self {
            store,
            embedder,
            agents,
            checkpoints,
            config,
        }
    }

    fn save_checkpoint(&self, state: &WorkflowState, step: &str) -> OrchestratorResult<()> {
        let checkpoint_id = format!("{}-{}", state.workflow_id, step);
        self.checkpoints
            .save(&state.workflow_id, &checkpoint_id, None, state, json!({ "step": step }))?;
        Ok(())
    }

    fn build_voice_profile(
        &self,
        project_id: &str,
        writing_samples: &[String],
        cost_ctx: &CostContext,
    ) -> OrchestratorResult<VoiceProfile> {
        let analysis = analyze_voice(&self.agents.voice_analyst, writing_samples, cost_ctx)?;
        let reference_text = writing_samples.join("\n\n");
        let stylometry: Stylometry = extract_features(&reference_text);
        let embedding = self
            .embedder
            .embed(&reference_text)
            .map_err(ghostline_chapter::ChapterError::from)?;

        let (common_phrases, sentence_starters, transition_words) = match analysis.structured_data {
            Some(a) => (a.common_phrases, a.sentence_starters, a.transition_words),
            None => {
                warn!("VoiceAnalyst returned unparseable JSON; building profile from stylometry only");
                (Vec::new(), Vec::new(), Vec::new())
            }
        };

        Ok(VoiceProfile {
            project_id: project_id.to_string(),
            embedding,
            stylometry,
            common_phrases,
            sentence_starters,
            transition_words,
            similarity_threshold: self.config.grounding.voice_threshold,
            embedding_weight: 0.4,
            writing_samples: writing_samples.to_vec(),
        })
    }

    /// Runs `ingest → embed → generate_outline → request_approval` and
    /// returns the paused state (spec §4.11 `wait_for_approval`).
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        &self,
        workflow_id: &str,
        project_id: &str,
        user_id: &str,
        title: &str,
        description: &str,
        sources: Vec<IngestedSource>,
        writing_samples: Vec<String>,
        target_pages: Option<u32>,
        target_chapters: u32,
        words_per_page: u32,
    ) -> OrchestratorResult<WorkflowState> {
        let target_words_per_chapter = target_pages
            .map(|pages| (pages * words_per_page) / target_chapters.max(1))
            .unwrap_or(2000);

        let mut state = WorkflowState::new(workflow_id, project_id, user_id, target_chapters, target_words_per_chapter);
        state.target_pages = target_pages;
        let cost_ctx = CostContext::new(workflow_id, project_id);

        // ingest
        state.source_summaries = sources.iter().map(|s| naive_summary(&s.chunks)).collect();
        if !writing_samples.is_empty() {
            state.voice_profile = Some(self.build_voice_profile(project_id, &writing_samples, &cost_ctx)?);
        }

        // embed
        state.transition(Phase::Embed).ok();
        for source in &sources {
            let embeddings = self
                .embedder
                .embed_batch(&source.chunks)
                .map_err(ghostline_chapter::ChapterError::from)?;
            let chunks: Vec<SourceChunk> = source
                .chunks
                .iter()
                .zip(embeddings.into_iter())
                .enumerate()
                .map(|(idx, (content, embedding))| {
                    SourceChunk::new(
                        format!("{}-{idx}", source.source_material_id),
                        project_id,
                        source.source_material_id.clone(),
                        source.filename.clone(),
                        content.clone(),
                        idx as u32,
                        embedding,
                    )
                })
                .collect();
            self.store.upsert_chunks(chunks)?;
        }

        // generate_outline
        state.transition(Phase::OutlineGeneration).ok();
        let voice_guidance = state
            .voice_profile
            .as_ref()
            .map(|p| p.common_phrases.join(", "))
            .unwrap_or_default();
        let outline_state = OutlineState::new(
            state.source_summaries.clone(),
            title,
            description,
            target_chapters,
            voice_guidance,
        );
        let outline_result = run_outline_subgraph(
            &self.agents.outline_planner,
            &self.agents.outline_critic,
            outline_state,
            &self.config.outline_bounds,
            &cost_ctx,
        )?;
        if self.config.strict_mode.enabled && !outline_result.approved {
            state.error = Some("outline critic never approved within bounds".to_string());
            return Err(OrchestratorError::OutlineNotApproved);
        }
        state.outline = outline_result.current_outline;
        state.total_tokens += outline_result.tokens_used;
        state.total_cost += outline_result.cost_incurred;

        // request_approval
        state.transition(Phase::OutlineReview).ok();
        state.pending_user_action = Some(ghostline_core::model::PendingUserAction::ApproveOutline);
        state.progress = 30;

        self.save_checkpoint(&state, "request_approval")?;
        Ok(state)
    }

    fn outline_context(outline: &Outline) -> String {
        format!(
            "Title: {}\nPremise: {}\nThemes: {}\nChapters: {}",
            outline.title,
            outline.premise,
            outline.themes.join(", "),
            outline
                .chapters
                .iter()
                .map(|c| format!("{}. {}", c.number, c.title))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    fn retrieval_query(title: &str, description: &str, chapter: &OutlineChapter) -> String {
        format!(
            "{title} {description} {} {} {}",
            chapter.title,
            chapter.summary,
            chapter.key_points.join(" "),
        )
    }

    /// Applies the user's approval decision and, if approved, runs the
    /// entire remaining chapter loop through `complete` in one call
    /// (spec §4.11: `wait_for_approval` is the only interrupt point).
    pub fn resume(
        &self,
        workflow_id: &str,
        title: &str,
        description: &str,
        approve_outline: bool,
        feedback: Option<String>,
    ) -> OrchestratorResult<WorkflowState> {
        let checkpoint = self
            .checkpoints
            .load_latest(workflow_id)?
            .ok_or_else(|| OrchestratorError::NotFound(workflow_id.to_string()))?;
        let mut state = checkpoint.state;

        if let Some(fb) = feedback {
            state.user_feedback.push(fb);
        }
        state.outline_approved = approve_outline;

        if !approve_outline {
            // not approved → END (still paused): checkpoint and return as-is.
            self.save_checkpoint(&state, "resume_not_approved")?;
            return Ok(state);
        }

        state.pending_user_action = None;
        state
            .transition(Phase::ChapterDrafting)
            .map_err(|_| OrchestratorError::NotApproved(workflow_id.to_string()))?;

        let outline = state.outline.clone().unwrap_or_default();
        let outline_ctx = Self::outline_context(&outline);
        let total_chapters = outline.chapters.len().max(1);
        let strict = self.config.strict_mode.enabled;
        let cost_ctx = CostContext::new(workflow_id, state.project_id.as_str());

        let thresholds = GroundingThresholds {
            voice_threshold: self.config.grounding.voice_threshold,
            fact_threshold: self.config.grounding.fact_threshold,
            cohesion_threshold: self.config.grounding.cohesion_threshold,
        };
        let voice_guidance = state
            .voice_profile
            .as_ref()
            .map(|p| p.common_phrases.join(", "))
            .unwrap_or_default();

        for chapter_outline in outline.chapters.clone() {
            let chapter_cost_ctx = cost_ctx.for_chapter(chapter_outline.number);
            let query = Self::retrieval_query(title, description, &chapter_outline);

            let rag = match retrieve(
                self.store.as_ref(),
                &self.embedder,
                &query,
                &state.project_id,
                self.config.retrieval.top_k,
                self.config.retrieval.similarity_threshold,
            ) {
                Ok(rag) => rag,
                Err(err) => {
                    state.error = Some(err.to_string());
                    if strict {
                        return Err(err.into());
                    }
                    warn!(chapter = chapter_outline.number, error = %err, "retrieval failed; drafting with no source chunks");
                    ghostline_retrieval::RAGResult::default()
                }
            };

            let chapter_state = ChapterState::new(
                chapter_outline.clone(),
                rag.chunks,
                state.chapter_summaries.clone(),
                state.recent_canon(3).to_vec(),
                state.voice_profile.clone(),
                voice_guidance.clone(),
                chapter_outline.estimated_words,
                true,
            );
            let chapter_agents = ChapterAgents {
                drafter: &self.agents.content_drafter,
                voice_editor: &self.agents.voice_editor,
                fact_checker: &self.agents.fact_checker,
                cohesion_analyst: &self.agents.cohesion_analyst,
            };

            let chapter_result = run_chapter_subgraph(
                &chapter_agents,
                &self.embedder,
                chapter_state,
                &outline_ctx,
                &thresholds,
                &self.config.chapter_bounds,
                self.config.grounding.destructive_sanitizer,
                &chapter_cost_ctx,
            );

            let chapter_state = match chapter_result {
                Ok(cs) => cs,
                Err(err) => {
                    state.error = Some(err.to_string());
                    if strict {
                        return Err(err.into());
                    }
                    warn!(chapter = chapter_outline.number, error = %err, "chapter drafting failed; stopping chapter loop");
                    break;
                }
            };

            if strict && !chapter_state.quality_gates_passed {
                state.error = Some(format!(
                    "chapter {} failed its quality gate: {:?}",
                    chapter_outline.number, chapter_state.quality_gate_report.style_issues
                ));
                return Err(OrchestratorError::QualityGateFailed { chapter: chapter_outline.number });
            }

            state.total_tokens += chapter_state.tokens_used;
            state.total_cost += chapter_state.cost_incurred;

            let summary = naive_summary(&[chapter_state.content_clean.clone()]);
            state.chapter_summaries.push(summary.clone());
            state.chapter_canon.push(CanonBlock {
                chapter_number: chapter_outline.number,
                title: chapter_outline.title.clone(),
                outline_summary: chapter_outline.summary.clone(),
                key_points: chapter_outline.key_points.clone(),
                grounded_commitments: chapter_state
                    .claim_mappings
                    .iter()
                    .filter(|c| c.is_supported)
                    .map(|c| c.claim.clone())
                    .collect(),
                needs_review: chapter_state
                    .claim_mappings
                    .iter()
                    .filter(|c| c.needs_human_review)
                    .map(|c| c.claim.clone())
                    .collect(),
                unsupported: chapter_state
                    .claim_mappings
                    .iter()
                    .filter(|c| !c.is_supported)
                    .map(|c| c.claim.clone())
                    .collect(),
                citations_ok: chapter_state.quality_gate_report.citations_ok,
                style_issues: chapter_state.quality_gate_report.style_issues.clone(),
            });

            state.chapters.push(Chapter {
                number: chapter_outline.number,
                title: chapter_outline.title.clone(),
                content_raw: chapter_state.final_content.clone(),
                content_clean: chapter_state.content_clean.clone(),
                word_count: chapter_state.content_clean.split_whitespace().count() as u32,
                voice_score: chapter_state.voice_score,
                fact_score: chapter_state.fact_score,
                cohesion_score: chapter_state.cohesion_score,
                citations: chapter_state.citations.clone(),
                citation_report: chapter_state.citation_report.clone(),
                quality_gates_passed: chapter_state.quality_gates_passed,
                quality_gate_report: chapter_state.quality_gate_report.clone(),
                revision_history: chapter_state.revision_history.clone(),
            });

            state.progress = (30.0 + 60.0 * (chapter_outline.number as f64 / total_chapters as f64)).round() as u8;
            self.save_checkpoint(&state, &format!("chapter_{}", chapter_outline.number))?;
        }

        // safety_check
        state.transition(Phase::SafetyCheck).ok();
        let concatenated: String = state
            .chapters
            .iter()
            .map(|c| c.content_clean.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let safety_result = check_content(&concatenated, strict);
        state.safety_passed = safety_result.is_safe;
        state.safety_findings = safety_result.findings;
        state.suggested_disclaimer = safety_result.suggested_disclaimer;
        state.progress = 92;

        // finalize
        state.transition(Phase::Finalize).ok();
        state.progress = 95;
        self.save_checkpoint(&state, "finalize")?;

        // complete
        state.transition(Phase::Completed).ok();
        state.progress = 100;
        self.save_checkpoint(&state, "complete")?;

        Ok(state)
    }

    pub fn get_state(&self, workflow_id: &str) -> OrchestratorResult<WorkflowState> {
        self.checkpoints
            .load_latest(workflow_id)?
            .map(|c| c.state)
            .ok_or_else(|| OrchestratorError::NotFound(workflow_id.to_string()))
    }
}
