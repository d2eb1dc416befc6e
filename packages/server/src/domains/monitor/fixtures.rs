//! Built-in page extracted in development mode when the source is unreachable.

use extraction::{Extractor, Record, RecordSource};

pub const FIXTURE_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Launch board (fixture)</title></head>
  <body>
    <div class="token-card">
      <p>TEST Testtoken TestAddr... NEW</p>
      <a href="https://example.com/test">chart</a>
    </div>
  </body>
</html>
"#;

/// Run the fixture page through `extractor`, tagging results as fixtures.
pub fn fixture_records(extractor: &Extractor) -> Vec<Record> {
    extractor
        .extract(FIXTURE_PAGE)
        .into_iter()
        .map(|record| record.with_source(RecordSource::Fixture))
        .collect()
}
