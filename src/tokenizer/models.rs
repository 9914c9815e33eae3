/// What a catalog model is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Summarization,
    QuestionAnswering,
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Task::Summarization => write!(f, "summarization"),
            Task::QuestionAnswering => write!(f, "question-answering"),
        }
    }
}

pub struct ModelSpec {
    pub id: &'static str,             // "sshleifer/distilbart-cnn-12-6"
    pub name: &'static str,           // "DistilBART CNN (Default)"
    pub task: Task,
    pub max_input_tokens: usize,      // encoder context window
    pub description: &'static str,
    pub tokenizer_url: &'static str,  // HuggingFace URL to tokenizer.json
}

pub const MODELS: &[ModelSpec] = &[
    // ── Summarization ────────────────────────────────────────────────
    ModelSpec {
        id: "sshleifer/distilbart-cnn-12-6",
        name: "DistilBART CNN 12-6 (Default)",
        task: Task::Summarization,
        max_input_tokens: 1024,
        description: "Distilled BART fine-tuned on CNN/DailyMail. Fast, news-style summaries.",
        tokenizer_url: "https://huggingface.co/Xenova/distilbart-cnn-12-6/resolve/main/tokenizer.json",
    },
    ModelSpec {
        id: "facebook/bart-large-cnn",
        name: "BART Large CNN",
        task: Task::Summarization,
        max_input_tokens: 1024,
        description: "Full-size BART on CNN/DailyMail. Better summaries, roughly twice as slow.",
        tokenizer_url: "https://huggingface.co/Xenova/bart-large-cnn/resolve/main/tokenizer.json",
    },
    ModelSpec {
        id: "google-t5/t5-small",
        name: "T5 Small",
        task: Task::Summarization,
        max_input_tokens: 512,
        description: "Small general-purpose T5. Short context, lowest latency.",
        tokenizer_url: "https://huggingface.co/Xenova/t5-small/resolve/main/tokenizer.json",
    },

    // ── Question answering ───────────────────────────────────────────
    ModelSpec {
        id: "deepset/roberta-base-squad2",
        name: "RoBERTa Base SQuAD2 (Default)",
        task: Task::QuestionAnswering,
        max_input_tokens: 512,
        description: "Extractive QA trained on SQuAD 2.0. Handles unanswerable questions.",
        tokenizer_url: "https://huggingface.co/deepset/roberta-base-squad2/resolve/main/tokenizer.json",
    },
    ModelSpec {
        id: "distilbert/distilbert-base-cased-distilled-squad",
        name: "DistilBERT Cased SQuAD",
        task: Task::QuestionAnswering,
        max_input_tokens: 512,
        description: "Distilled BERT on SQuAD 1.1. Smaller and faster, always returns a span.",
        tokenizer_url: "https://huggingface.co/Xenova/distilbert-base-cased-distilled-squad/resolve/main/tokenizer.json",
    },
];

pub fn get_model(id: &str) -> Option<&'static ModelSpec> {
    MODELS.iter().find(|m| m.id == id)
}

pub fn default_model(task: Task) -> &'static ModelSpec {
    match task {
        Task::Summarization => &MODELS[0],
        Task::QuestionAnswering => &MODELS[3],
    }
}

pub fn models_for(task: Task) -> impl Iterator<Item = &'static ModelSpec> {
    MODELS.iter().filter(move |m| m.task == task)
}
