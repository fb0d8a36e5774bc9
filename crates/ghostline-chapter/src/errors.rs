use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChapterError {
    #[error(transparent)]
    Agent(#[from] ghostline_agents::AgentError),

    #[error(transparent)]
    Embedding(#[from] ghostline_embed::EmbeddingError),
}

pub type ChapterResult<T> = Result<T, ChapterError>;
