//! Launch-board pages with known extraction results.

/// Three tokens, each with an address; extracts to AAA, BBB, CCC in that order.
pub const THREE_TOKEN_PAGE: &str = r#"<html><body>
<div class="token">AAA Alpha AAAA1111... NEW</div>
<div class="token">BBB Bravo BBBB2222... NEW</div>
<div class="token">CCC Charlie CCCC3333... NEW</div>
</body></html>"#;

pub const THREE_TOKEN_KEYS: [&str; 3] = ["AAA:AAAA1111...", "BBB:BBBB2222...", "CCC:CCCC3333..."];

/// Nothing that looks like a launch.
pub const EMPTY_PAGE: &str =
    "<html><body><h1>Welcome</h1><p>nothing to see here today</p></body></html>";
