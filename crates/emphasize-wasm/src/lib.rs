use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn render_html(input: &str, soft_break_as_space: bool) -> String {
    let soft_break = if soft_break_as_space {
        emphasize::SoftBreak::Space
    } else {
        emphasize::SoftBreak::Newline
    };
    let cfg = emphasize::ConfigBuilder::default()
        .soft_break(soft_break)
        .build();
    emphasize::render(input, Some(cfg))
}

// Exposes the syntax tree for debugging
#[wasm_bindgen]
pub fn tree_debug(input: &str) -> String {
    let tree = emphasize::parse_document(input);
    let dump = format!("{tree:#?}");
    emphasize::syntax::release(tree);
    dump
}
