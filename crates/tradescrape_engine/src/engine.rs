use std::ops::ControlFlow;

use tradescrape_core::{PageKind, PageProgram, PageResult, Program};
use tradescrape_logging::{scrape_debug, scrape_info, scrape_warn};

use crate::decode::decode_page;
use crate::error::EngineError;
use crate::events::walk_events;
use crate::settings::EngineSettings;

/// Decode `bytes`, run the program for `kind` over the document and return
/// its terminal result.
///
/// Errors cover only the outer layers (size limit, decoding). A page that
/// does not match the expected markup is a successful call whose result
/// reports `parsed_ok() == false`.
pub fn parse_page(
    bytes: &[u8],
    encoding_label: &str,
    kind: PageKind,
    settings: &EngineSettings,
) -> Result<PageResult, EngineError> {
    let actual = bytes.len() as u64;
    if actual > settings.max_bytes {
        return Err(EngineError::TooLarge {
            max_bytes: settings.max_bytes,
            actual,
        });
    }

    let decoded = decode_page(bytes, encoding_label, settings.detect_unknown_encoding)?;
    scrape_debug!(
        "decoded {} bytes as {} for {:?}",
        actual,
        decoded.encoding_label,
        kind
    );

    let mut program = PageProgram::new(kind);
    walk_events(&decoded.text, |event| {
        program.feed(&event);
        if program.is_terminal() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    let result = program.finish();

    if result.parsed_ok() {
        scrape_info!("{:?} page parsed", kind);
    } else {
        scrape_warn!("{:?} page did not match: {:?}", kind, result);
    }
    Ok(result)
}

/// Run any program over already-decoded markup.
pub fn run_program<P: Program>(html: &str, mut program: P) -> P::Output {
    walk_events(html, |event| {
        program.feed(&event);
        if program.is_terminal() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    program.finish()
}
