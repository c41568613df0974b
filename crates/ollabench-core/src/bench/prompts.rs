//! Prompt corpus for probes

use rand::seq::SliceRandom;

/// Default questions, grouped loosely by topic so generated lengths vary
pub const DEFAULT_PROMPTS: &[&str] = &[
    // Science
    "Why is the sky blue?",
    "Why do we dream?",
    "Why is sea water salty?",
    "Why do leaves change color in autumn?",
    "Why do birds sing?",
    // Programming
    "Explain what a decorator is in Python.",
    "What is object-oriented programming?",
    "How do you handle exceptions in Python?",
    "Explain what a recursive function is.",
    "What is a design pattern?",
    // Mathematics
    "Explain the Fourier transform.",
    "What is calculus?",
    "Explain what linear algebra is.",
    "What is probability theory?",
    "Explain what statistics is.",
    // AI / ML
    "What is a neural network?",
    "Explain what deep learning is.",
    "What is machine learning?",
    "Explain what reinforcement learning is.",
    "What is natural language processing?",
    // Philosophy
    "What is consciousness?",
    "Why do we exist?",
    "What is free will?",
    "Explain what morality is.",
    "What is knowledge?",
];

/// Fixed set of prompts probes draw from uniformly
#[derive(Debug, Clone)]
pub struct PromptCorpus {
    prompts: Vec<String>,
}

impl PromptCorpus {
    /// Build from custom prompts. Falls back to the defaults when empty.
    pub fn new(prompts: Vec<String>) -> Self {
        if prompts.is_empty() {
            return Self::default();
        }
        Self { prompts }
    }

    /// Pick a prompt at random
    pub fn choose(&self) -> &str {
        self.prompts
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(DEFAULT_PROMPTS[0])
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }
}

impl Default for PromptCorpus {
    fn default() -> Self {
        Self {
            prompts: DEFAULT_PROMPTS.iter().map(|p| p.to_string()).collect(),
        }
    }
}
