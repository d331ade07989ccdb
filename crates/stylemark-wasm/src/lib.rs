//! WASM bindings for the stylemark compiler.
//!
//! Exposes `transform()` and `compile()` to JavaScript via wasm-bindgen.
//! Parse errors are thrown as JS errors.

use stylemark_codegen::Transformer;
use stylemark_parser::Parser;
use wasm_bindgen::prelude::*;

/// Convert stylemark source to HTML.
#[wasm_bindgen]
pub fn transform(source: &str, indent: bool) -> Result<String, JsError> {
    stylemark_codegen::transform(source, indent).map_err(|e| JsError::new(&e.to_string()))
}

/// Convert stylemark source to HTML and return the syntax tree with it.
///
/// Returns a JS object `{ html: string, ast: object }`.
/// Throws a JS error if parsing fails.
#[wasm_bindgen]
pub fn compile(source: &str, indent: bool) -> Result<JsValue, JsError> {
    let ast = Parser::parse(source).map_err(|e| JsError::new(&e.to_string()))?;
    let html = Transformer::new().indent(indent).generate(&ast);

    let json = ast.to_json().map_err(|e| JsError::new(&e.to_string()))?;
    let ast = js_sys::JSON::parse(&json).map_err(|_| JsError::new("Failed to parse AST JSON"))?;

    // Plain JS object { html, ast }
    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"html".into(), &html.into())
        .map_err(|_| JsError::new("Failed to set html property"))?;
    js_sys::Reflect::set(&js_obj, &"ast".into(), &ast)
        .map_err(|_| JsError::new("Failed to set ast property"))?;

    Ok(js_obj.into())
}

/// Get the compiler version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
