use std::time::Duration;

use crate::timer::Timer;

pub const DEFAULT_PHRASES: [&str; 4] = [
    "Full Stack Developer",
    "Web Designer",
    "Problem Solver",
    "Code Enthusiast",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypingError {
    #[error("typing effect needs at least one phrase")]
    NoPhrases,
    #[error("phrase {0} is empty")]
    EmptyPhrase(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypingOptions {
    pub phrases: Vec<String>,
    pub start_delay: Duration,
    pub type_delay: Duration,
    pub delete_delay: Duration,
    /// Hold time once a phrase is fully typed.
    pub hold_delay: Duration,
    /// Pause after a phrase is fully deleted.
    pub next_phrase_delay: Duration,
}

impl Default for TypingOptions {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_PHRASES.iter().map(|phrase| phrase.to_string()).collect(),
            start_delay: Duration::from_millis(1000),
            type_delay: Duration::from_millis(100),
            delete_delay: Duration::from_millis(50),
            hold_delay: Duration::from_millis(2000),
            next_phrase_delay: Duration::from_millis(500),
        }
    }
}

impl TypingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    pub fn start_delay(mut self, value: Duration) -> Self {
        self.start_delay = value;
        self
    }

    pub fn type_delay(mut self, value: Duration) -> Self {
        self.type_delay = value;
        self
    }

    pub fn delete_delay(mut self, value: Duration) -> Self {
        self.delete_delay = value;
        self
    }

    pub fn hold_delay(mut self, value: Duration) -> Self {
        self.hold_delay = value;
        self
    }

    pub fn next_phrase_delay(mut self, value: Duration) -> Self {
        self.next_phrase_delay = value;
        self
    }
}

/// One rendered step: the subtitle text and how long to wait before the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypingFrame {
    pub text: String,
    pub next_delay: Duration,
}

/// Type-then-delete loop over the configured phrases. Positions count
/// characters, never bytes.
#[derive(Clone, Debug)]
pub struct TypingEffect {
    options: TypingOptions,
    phrases: Vec<Vec<char>>,
    phrase_index: usize,
    char_index: usize,
    deleting: bool,
}

impl TypingEffect {
    pub fn new(options: TypingOptions) -> Result<Self, TypingError> {
        if options.phrases.is_empty() {
            return Err(TypingError::NoPhrases);
        }
        if let Some(index) = options.phrases.iter().position(String::is_empty) {
            return Err(TypingError::EmptyPhrase(index));
        }
        let phrases = options
            .phrases
            .iter()
            .map(|phrase| phrase.chars().collect())
            .collect();
        Ok(Self {
            options,
            phrases,
            phrase_index: 0,
            char_index: 0,
            deleting: false,
        })
    }

    pub fn options(&self) -> &TypingOptions {
        &self.options
    }

    pub fn start_delay(&self) -> Duration {
        self.options.start_delay
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    pub fn tick(&mut self) -> TypingFrame {
        let phrase = &self.phrases[self.phrase_index];
        if self.deleting {
            self.char_index -= 1;
        } else {
            self.char_index += 1;
        }
        let text = phrase[..self.char_index].iter().collect();

        let next_delay = if !self.deleting && self.char_index == phrase.len() {
            self.deleting = true;
            self.options.hold_delay
        } else if self.deleting && self.char_index == 0 {
            self.deleting = false;
            self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
            self.options.next_phrase_delay
        } else if self.deleting {
            self.options.delete_delay
        } else {
            self.options.type_delay
        };

        TypingFrame { text, next_delay }
    }

    /// Drives the effect on `timer`, handing every frame to `render`. Stops
    /// as soon as `render` returns `false`.
    pub async fn run<F>(mut self, timer: &dyn Timer, mut render: F)
    where
        F: FnMut(&TypingFrame) -> bool,
    {
        timer.sleep(self.options.start_delay).await;
        loop {
            let frame = self.tick();
            if !render(&frame) {
                tracing::debug!("typing effect stopped");
                return;
            }
            timer.sleep(frame.next_delay).await;
        }
    }
}
