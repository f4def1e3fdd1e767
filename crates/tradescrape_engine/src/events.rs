//! Event source: tokenizes decoded markup into start-tag, end-tag and text
//! events in source order.
//!
//! Only the html5ever tokenizer runs. No tree is built, so nothing is
//! repaired, re-parented or implied: events follow the bytes as written.
use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, CharacterTokens, EndTag, NullCharacterToken, StartTag, Tag, TagToken, Token,
    TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tradescrape_core::{Attributes, Event};

/// Elements that never have content and so produce no end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Bytes handed to the tokenizer per feed. A sink that breaks stops the scan
/// at the next slice boundary.
const FEED_CHUNK_BYTES: usize = 4096;

struct EventSink<F> {
    emit: RefCell<F>,
    text: RefCell<String>,
    stopped: Cell<bool>,
}

impl<F> EventSink<F>
where
    F: FnMut(Event) -> ControlFlow<()>,
{
    fn new(emit: F) -> Self {
        Self {
            emit: RefCell::new(emit),
            text: RefCell::new(String::new()),
            stopped: Cell::new(false),
        }
    }

    fn send(&self, event: Event) {
        if self.stopped.get() {
            return;
        }
        let mut emit = self.emit.borrow_mut();
        if (*emit)(event).is_break() {
            self.stopped.set(true);
        }
    }

    /// Adjacent character tokens form one text event.
    fn flush_text(&self) {
        let text = self.text.take();
        if !text.is_empty() {
            self.send(Event::Text(text));
        }
    }

    fn on_tag(&self, tag: Tag) -> TokenSinkResult<()> {
        self.flush_text();
        let name: &str = &tag.name;
        let name = name.to_ascii_lowercase();
        let is_void = VOID_ELEMENTS.contains(&name.as_str());
        match tag.kind {
            StartTag => {
                let attrs = Attributes::from_pairs(
                    tag.attrs
                        .iter()
                        .map(|attr| (&*attr.name.local, &*attr.value)),
                );
                self.send(Event::StartTag {
                    name: name.clone(),
                    attrs,
                });
                if tag.self_closing {
                    if !is_void {
                        self.send(Event::EndTag { name });
                    }
                    return TokenSinkResult::Continue;
                }
                raw_content(&name).map_or(TokenSinkResult::Continue, TokenSinkResult::RawData)
            }
            EndTag => {
                if !is_void {
                    self.send(Event::EndTag { name });
                }
                TokenSinkResult::Continue
            }
        }
    }
}

/// Elements whose content is text up to the matching end tag.
fn raw_content(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

impl<F> TokenSink for EventSink<F>
where
    F: FnMut(Event) -> ControlFlow<()>,
{
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        if self.stopped.get() {
            return TokenSinkResult::Continue;
        }
        match token {
            TagToken(tag) => return self.on_tag(tag),
            CharacterTokens(chars) => self.text.borrow_mut().push_str(&chars),
            NullCharacterToken => self.text.borrow_mut().push(char::REPLACEMENT_CHARACTER),
            Token::ParseError(_) => {}
            // Comments, doctypes and end of input still split text runs.
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => {
                self.flush_text()
            }
        }
        TokenSinkResult::Continue
    }
}

fn feed_chunks<'a>(html: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let mut rest = html;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let mut end = FEED_CHUNK_BYTES.min(rest.len());
        while !rest.is_char_boundary(end) {
            end += 1;
        }
        let (chunk, tail) = rest.split_at(end);
        rest = tail;
        Some(chunk)
    })
}

/// Tokenize `html` and hand each event to `sink` until it breaks or the
/// input ends. Comments, doctypes and processing instructions are skipped.
pub fn walk_events<F>(html: &str, sink: F)
where
    F: FnMut(Event) -> ControlFlow<()>,
{
    let tokenizer = Tokenizer::new(EventSink::new(sink), TokenizerOpts::default());
    let input = BufferQueue::default();
    for chunk in feed_chunks(html) {
        input.push_back(StrTendril::from_slice(chunk));
        let _ = tokenizer.feed(&input);
        if tokenizer.sink.stopped.get() {
            return;
        }
    }
    tokenizer.end();
}

/// Collect every event of a document.
pub fn collect_events(html: &str) -> Vec<Event> {
    let mut events = Vec::new();
    walk_events(html, |event| {
        events.push(event);
        ControlFlow::Continue(())
    });
    events
}
