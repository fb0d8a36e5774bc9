//! `Outline` — created by OutlineSubgraph; mutated only through additional
//! subgraph iterations; frozen on user approval.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutlineChapter {
    pub number: u32,
    pub title: String,
    pub summary: String,
    pub key_points: Vec<String>,
    pub estimated_words: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Outline {
    pub title: String,
    pub premise: String,
    pub chapters: Vec<OutlineChapter>,
    pub themes: Vec<String>,
    pub target_audience: String,
}

impl Outline {
    /// Truncates `chapters` to `target_chapters` and renumbers 1..N
    /// (spec §4.9 "Trim").
    pub fn trim_and_renumber(&mut self, target_chapters: usize) {
        self.chapters.truncate(target_chapters);
        for (i, chapter) in self.chapters.iter_mut().enumerate() {
            chapter.number = (i + 1) as u32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(n: u32) -> OutlineChapter {
        OutlineChapter {
            number: n,
            title: format!("Chapter {n}"),
            summary: String::new(),
            key_points: vec![],
            estimated_words: 1000,
        }
    }

    #[test]
    fn trim_renumbers_densely() {
        let mut outline = Outline {
            chapters: vec![chapter(5), chapter(9), chapter(1), chapter(2), chapter(3)],
            ..Default::default()
        };
        outline.trim_and_renumber(3);
        let numbers: Vec<u32> = outline.chapters.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
