//! Synthetic documents for benches and allocation guards.

pub const BLOCK_TEMPLATE: &str =
    "<div class=box data-charset=\"x\"><span>hello</span><!-- note --><img src=x alt='y'></div>\n";

pub const HEAD_TEMPLATE: &str = "<!doctype html><html><head><title>bench</title>\
<link rel=stylesheet href=a.css charset=utf-8>\
<meta name=viewport content=\"width=device-width, initial-scale=1\">";

/// `blocks` copies of [`BLOCK_TEMPLATE`]: plenty of tags and attributes, no
/// declaration.
pub fn make_blocks(blocks: usize) -> String {
    let mut html = String::with_capacity(BLOCK_TEMPLATE.len() * blocks);
    for _ in 0..blocks {
        html.push_str(BLOCK_TEMPLATE);
    }
    html
}

/// A head section followed by `blocks` filler blocks and a trailing
/// `<meta charset>` carrying `label`.
pub fn make_late_declaration(blocks: usize, label: &str) -> String {
    let mut html = String::from(HEAD_TEMPLATE);
    html.push_str(&make_blocks(blocks));
    html.push_str("<meta charset=\"");
    html.push_str(label);
    html.push_str("\">");
    html
}

/// One long comment hiding a declaration; exercises the comment fast path.
pub fn make_long_comment(len: usize) -> String {
    let mut html = String::with_capacity(len + 64);
    html.push_str("<!--");
    html.extend(std::iter::repeat_n('c', len));
    html.push_str("<meta charset=koi8-r>--><meta charset=utf-8>");
    html
}
