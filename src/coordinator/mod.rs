//! Conversion coordination for live editing surfaces.
//!
//! A surface reports every input change; the coordinator turns each change
//! into a parse request and applies results in request order, not
//! completion order. Only the most recently started request may touch the
//! surface. Earlier requests that resolve later are discarded.
//!
//! ```text
//! Idle -> Parsing -> Applied
//!                 -> Restored    (parse failed)
//!                 -> (discarded) (superseded by a newer request)
//! ```

mod surface;

pub use surface::{EditingSurface, MemorySurface};

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{Error, Result};
use crate::model::Document;
use crate::parser::{ChunkedParser, MarkdownParser, ParseOptions, Progress};

/// Options for the conversion coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Inputs longer than this many bytes skip parsing and stay literal
    pub large_input_threshold: usize,

    /// Minimum lines per chunk for incremental application
    pub chunk_lines: usize,

    /// Options passed to the parser
    pub parse: ParseOptions,
}

impl CoordinatorOptions {
    /// Create coordinator options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the large-input threshold in bytes.
    pub fn with_large_input_threshold(mut self, bytes: usize) -> Self {
        self.large_input_threshold = bytes;
        self
    }

    /// Set the chunk size for incremental application.
    pub fn with_chunk_lines(mut self, lines: usize) -> Self {
        self.chunk_lines = lines.max(1);
        self
    }

    /// Set the parse options.
    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// Check if `input` is too large to parse.
    pub fn exceeds_threshold(&self, input: &str) -> bool {
        input.len() > self.large_input_threshold
    }
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            large_input_threshold: 200_000,
            chunk_lines: 200,
            parse: ParseOptions::default(),
        }
    }
}

/// Coordinator state as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No request has been started
    Idle,
    /// Request `seq` is the latest and has not resolved
    Parsing { seq: u64 },
    /// The surface shows the result of request `seq`
    Applied { seq: u64 },
    /// Request `seq` failed and its input was restored as plain text
    Restored { seq: u64 },
}

/// What happened to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Input matched the last applied text; nothing was parsed
    Unchanged,
    /// The parsed tree was applied
    Applied,
    /// Input exceeded the size threshold and was applied as literal text
    LiteralFallback,
    /// A newer request started first; the result was discarded
    Superseded,
    /// Parsing failed; the input was restored as plain text
    Restored,
}

/// A parse request started by [`ConversionCoordinator::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    seq: u64,
    input: String,
}

impl ConversionRequest {
    /// Get the request's sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Get the input text.
    pub fn input(&self) -> &str {
        &self.input
    }
}

type ParseFuture = Pin<Box<dyn Future<Output = Result<Document>> + Send>>;
type ParseFn = Arc<dyn Fn(String, ParseOptions) -> ParseFuture + Send + Sync>;

#[derive(Debug)]
struct State {
    seq: u64,
    phase: Phase,
    last_applied: Option<String>,
}

/// Applies asynchronous parse results to one editing surface.
pub struct ConversionCoordinator<S: EditingSurface> {
    surface: Arc<S>,
    options: CoordinatorOptions,
    parser: ParseFn,
    state: Mutex<State>,
}

impl<S: EditingSurface> ConversionCoordinator<S> {
    /// Create a coordinator for `surface` using the crate's parser.
    pub fn new(surface: Arc<S>, options: CoordinatorOptions) -> Self {
        Self {
            surface,
            options,
            parser: Arc::new(|input: String, options: ParseOptions| -> ParseFuture {
                Box::pin(crate::parse_async(input, options))
            }),
            state: Mutex::new(State {
                seq: 0,
                phase: Phase::Idle,
                last_applied: None,
            }),
        }
    }

    /// Replace the parse function.
    pub fn with_parser<F, Fut>(mut self, parser: F) -> Self
    where
        F: Fn(String, ParseOptions) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Document>> + Send + 'static,
    {
        self.parser = Arc::new(move |input: String, options: ParseOptions| -> ParseFuture {
            Box::pin(parser(input, options))
        });
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the editing surface.
    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    /// Get the current phase.
    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    /// Get the input text of the last applied request.
    pub fn last_applied(&self) -> Option<String> {
        self.lock().last_applied.clone()
    }

    /// Register an input change.
    ///
    /// Returns `None` when `input` equals the last applied text. If a request
    /// is in flight at that point it is superseded, since the surface already
    /// shows this input.
    pub fn begin(&self, input: &str) -> Option<ConversionRequest> {
        let mut state = self.lock();

        if state.last_applied.as_deref() == Some(input) {
            if let Phase::Parsing { .. } = state.phase {
                state.seq += 1;
                state.phase = Phase::Applied { seq: state.seq };
            }
            return None;
        }

        state.seq += 1;
        state.phase = Phase::Parsing { seq: state.seq };
        Some(ConversionRequest {
            seq: state.seq,
            input: input.to_string(),
        })
    }

    /// Resolve a request with its parse result.
    pub fn complete(&self, request: ConversionRequest, result: Result<Document>) -> RequestOutcome {
        self.resolve(request, result, RequestOutcome::Applied)
    }

    fn resolve(
        &self,
        request: ConversionRequest,
        result: Result<Document>,
        outcome: RequestOutcome,
    ) -> RequestOutcome {
        let mut state = self.lock();
        if request.seq != state.seq {
            log::debug!(
                "Discarding result of request #{} (latest is #{})",
                request.seq,
                state.seq
            );
            return RequestOutcome::Superseded;
        }

        match result {
            Ok(doc) => {
                self.surface.replace_document(doc);
                state.phase = Phase::Applied { seq: request.seq };
                state.last_applied = Some(request.input);
                outcome
            }
            Err(err) => {
                log::warn!(
                    "Conversion request #{} failed: {}; restoring plain text",
                    request.seq,
                    err
                );
                self.surface.restore_plain_text(&request.input);
                state.phase = Phase::Restored { seq: request.seq };
                RequestOutcome::Restored
            }
        }
    }

    /// Parse `input` and apply the result unless a newer request wins.
    pub async fn submit(&self, input: &str) -> RequestOutcome {
        let Some(request) = self.begin(input) else {
            return RequestOutcome::Unchanged;
        };

        if self.options.exceeds_threshold(&request.input) {
            log::info!(
                "Input of {} bytes exceeds {} byte threshold; keeping it as literal text",
                request.input.len(),
                self.options.large_input_threshold
            );
            let doc = Document::literal(&request.input);
            return self.resolve(request, Ok(doc), RequestOutcome::LiteralFallback);
        }

        let result = (self.parser)(request.input.clone(), self.options.parse.clone()).await;
        self.complete(request, result)
    }
}

/// Parse `markdown` in chunks, appending each chunk to `surface` as it is
/// ready and reporting progress after every chunk.
///
/// The surface is cleared first. If parsing fails part way, the surface is
/// reset to `markdown` as plain text and the error is returned.
pub async fn apply_incrementally<S, F>(
    markdown: &str,
    surface: &S,
    options: &CoordinatorOptions,
    mut on_progress: F,
) -> Result<()>
where
    S: EditingSurface + ?Sized,
    F: FnMut(Progress),
{
    if options.exceeds_threshold(markdown) {
        log::info!(
            "Input of {} bytes exceeds {} byte threshold; keeping it as literal text",
            markdown.len(),
            options.large_input_threshold
        );
        let lines = markdown.split('\n').count();
        surface.replace_document(Document::literal(markdown));
        on_progress(Progress {
            processed: lines,
            total: lines,
        });
        return Ok(());
    }

    let parser = MarkdownParser::new(options.parse.clone());
    let mut chunks = ChunkedParser::new(markdown, parser, options.chunk_lines);
    surface.replace_document(Document::new());

    loop {
        match catch_unwind(AssertUnwindSafe(|| chunks.next())) {
            Ok(Some(chunk)) => {
                surface.append_blocks(chunk.blocks);
                on_progress(chunk.progress);
                tokio::task::yield_now().await;
            }
            Ok(None) => return Ok(()),
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                log::warn!("Incremental conversion failed: {}; restoring plain text", message);
                surface.restore_plain_text(markdown);
                return Err(Error::Pipeline(message));
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "parser panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DocumentNode;

    fn coordinator() -> ConversionCoordinator<MemorySurface> {
        ConversionCoordinator::new(Arc::new(MemorySurface::new()), CoordinatorOptions::default())
    }

    fn doc(text: &str) -> Document {
        Document::with_content(vec![DocumentNode::paragraph(vec![DocumentNode::text(text)])])
    }

    #[test]
    fn test_apply_and_unchanged() {
        let coord = coordinator();
        assert_eq!(coord.phase(), Phase::Idle);

        let request = coord.begin("a").unwrap();
        assert_eq!(coord.phase(), Phase::Parsing { seq: 1 });
        assert_eq!(coord.complete(request, Ok(doc("a"))), RequestOutcome::Applied);
        assert_eq!(coord.phase(), Phase::Applied { seq: 1 });
        assert_eq!(coord.last_applied().as_deref(), Some("a"));

        assert!(coord.begin("a").is_none());
        assert_eq!(coord.surface().replacement_count(), 1);
    }

    #[test]
    fn test_stale_result_discarded() {
        let coord = coordinator();
        let first = coord.begin("first").unwrap();
        let second = coord.begin("second").unwrap();

        assert_eq!(coord.complete(second, Ok(doc("second"))), RequestOutcome::Applied);
        assert_eq!(coord.complete(first, Ok(doc("first"))), RequestOutcome::Superseded);
        assert_eq!(coord.surface().document(), doc("second"));
    }

    #[test]
    fn test_failure_restores_input() {
        let coord = coordinator();
        let request = coord.begin("**broken").unwrap();
        let outcome = coord.complete(request, Err(Error::Pipeline("boom".into())));

        assert_eq!(outcome, RequestOutcome::Restored);
        assert_eq!(coord.phase(), Phase::Restored { seq: 1 });
        assert_eq!(coord.surface().document(), Document::literal("**broken"));
        assert_eq!(coord.last_applied(), None);
    }

    #[test]
    fn test_revert_supersedes_in_flight_request() {
        let coord = coordinator();
        let request = coord.begin("a").unwrap();
        coord.complete(request, Ok(doc("a")));

        let pending = coord.begin("ab").unwrap();
        assert!(coord.begin("a").is_none());
        assert_eq!(coord.complete(pending, Ok(doc("ab"))), RequestOutcome::Superseded);
        assert_eq!(coord.surface().document(), doc("a"));
    }

    #[test]
    fn test_panic_message() {
        let message: Box<dyn std::any::Any + Send> = Box::new("bad state");
        assert_eq!(panic_message(message.as_ref()), "bad state");
        let message: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(message.as_ref()), "owned");
    }
}
