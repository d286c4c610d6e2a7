//! Content stream interpreter that positions every shown glyph.
//!
//! Walks the operations decoded by [`lopdf::content::Content`] and tracks the
//! graphics and text state needed to place glyphs. Paths, images, colors and
//! clipping are ignored.

use std::collections::HashMap;
use std::rc::Rc;

use autohighlight_core::{Char, Ctm, Point, Quad};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId};
use tracing::{debug, warn};

use crate::error::BackendError;
use crate::font::LoadedFont;
use crate::lopdf_backend::{LopdfDocument, decode_content_stream, get_dict, object_to_f64, resolve};
use crate::text_state::{TextMatrices, TextParams};

/// Maximum nesting depth of Form XObjects.
pub const MAX_FORM_DEPTH: usize = 10;

/// Extract the glyphs of a page in content-stream order.
///
/// A content stream that cannot be decoded yields no glyphs and a warning
/// rather than an error, so the rest of the document is still processed.
pub fn extract_page_chars(
    doc: &LopdfDocument,
    page_index: usize,
) -> Result<Vec<Char>, BackendError> {
    let resources = doc.page_resources(page_index)?;
    let content = match doc.page_content(page_index) {
        Ok(content) => content,
        Err(e) => {
            warn!(page = page_index, error = %e, "skipping unreadable page content");
            return Ok(Vec::new());
        }
    };

    let mut interpreter = Interpreter::new(doc.inner());
    interpreter.run(&content, resources, 0);
    debug!(
        page = page_index,
        chars = interpreter.chars.len(),
        "extracted page glyphs"
    );
    Ok(interpreter.chars)
}

#[derive(Debug, Clone, Default)]
struct GraphicsState {
    ctm: Ctm,
    text: TextParams,
}

struct Interpreter<'a> {
    doc: &'a lopdf::Document,
    fonts: HashMap<ObjectId, Rc<LoadedFont>>,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    matrices: TextMatrices,
    chars: Vec<Char>,
}

impl<'a> Interpreter<'a> {
    fn new(doc: &'a lopdf::Document) -> Self {
        Self {
            doc,
            fonts: HashMap::new(),
            state: GraphicsState::default(),
            stack: Vec::new(),
            matrices: TextMatrices::default(),
            chars: Vec::new(),
        }
    }

    fn run(&mut self, content: &[u8], resources: &'a Dictionary, depth: usize) {
        let operations = match Content::decode(content) {
            Ok(content) => content.operations,
            Err(e) => {
                warn!(error = %e, "failed to decode content stream");
                return;
            }
        };

        for op in &operations {
            self.execute(op, resources, depth);
        }
    }

    fn execute(&mut self, op: &Operation, resources: &'a Dictionary, depth: usize) {
        let operands = &op.operands;
        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            "cm" => {
                if let Some(m) = matrix_operand(operands) {
                    self.state.ctm = m.concat(&self.state.ctm);
                }
            }

            "BT" => self.matrices.begin(),
            "ET" => {}

            "Tc" => set_number(operands, &mut self.state.text.char_spacing),
            "Tw" => set_number(operands, &mut self.state.text.word_spacing),
            "Tz" => set_number(operands, &mut self.state.text.h_scaling),
            "TL" => set_number(operands, &mut self.state.text.leading),
            "Ts" => set_number(operands, &mut self.state.text.rise),
            // Every render mode is searchable, invisible OCR text included.
            "Tr" => {}
            "Tf" => self.set_font(operands, resources),

            "Td" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    self.matrices.move_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    self.state.text.leading = -ty;
                    self.matrices.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = matrix_operand(operands) {
                    self.matrices.set(m);
                }
            }
            "T*" => self.matrices.next_line(self.state.text.leading),

            "Tj" => {
                if let Some(bytes) = string_operand(operands.first()) {
                    self.show_string(bytes);
                }
            }
            "'" => {
                self.matrices.next_line(self.state.text.leading);
                if let Some(bytes) = string_operand(operands.first()) {
                    self.show_string(bytes);
                }
            }
            "\"" => {
                set_number(operands, &mut self.state.text.word_spacing);
                if let Some(ac) = number(operands, 1) {
                    self.state.text.char_spacing = ac;
                }
                self.matrices.next_line(self.state.text.leading);
                if let Some(bytes) = string_operand(operands.get(2)) {
                    self.show_string(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    self.show_array(items);
                }
            }

            "Do" => {
                if let Some(Ok(name)) = operands.first().map(Object::as_name) {
                    self.invoke_xobject(name, resources, depth);
                }
            }
            _ => {}
        }
    }

    fn set_font(&mut self, operands: &[Object], resources: &Dictionary) {
        let (Some(Ok(name)), Some(size)) = (operands.first().map(Object::as_name), number(operands, 1))
        else {
            return;
        };
        self.state.text.font_size = size;
        self.state.text.font = Some(self.load_font(name, resources));
    }

    fn load_font(&mut self, name: &[u8], resources: &Dictionary) -> Rc<LoadedFont> {
        let doc = self.doc;
        let font_name = String::from_utf8_lossy(name);
        let font_ref = get_dict(doc, resources, b"Font").and_then(|fonts| fonts.get(name).ok());

        let Some(font_ref) = font_ref else {
            warn!(font = %font_name, "font resource not found, using default metrics");
            return Rc::new(LoadedFont::fallback(&font_name));
        };

        if let Object::Reference(id) = font_ref {
            if let Some(font) = self.fonts.get(id) {
                return Rc::clone(font);
            }
        }

        let font = match resolve(doc, font_ref).as_dict() {
            Ok(dict) => Rc::new(LoadedFont::load(doc, dict)),
            Err(_) => {
                warn!(font = %font_name, "font resource is not a dictionary, using default metrics");
                Rc::new(LoadedFont::fallback(&font_name))
            }
        };
        if let Object::Reference(id) = font_ref {
            self.fonts.insert(*id, Rc::clone(&font));
        }
        font
    }

    fn show_array(&mut self, items: &[Object]) {
        for item in items {
            match item {
                Object::String(bytes, _) => self.show_string(bytes),
                other => {
                    if let Ok(adjust) = object_to_f64(other) {
                        let text = &self.state.text;
                        let tx = -adjust / 1000.0 * text.font_size * text.h_scale();
                        self.matrices.advance(tx);
                    }
                }
            }
        }
    }

    fn show_string(&mut self, bytes: &[u8]) {
        let font = match &self.state.text.font {
            Some(font) => Rc::clone(font),
            None => {
                debug!("text shown without a font, using default metrics");
                let font = Rc::new(LoadedFont::fallback(""));
                self.state.text.font = Some(Rc::clone(&font));
                font
            }
        };
        let text = self.state.text.clone();
        let ascent = font.ascent() / 1000.0;
        let descent = font.descent() / 1000.0;

        for glyph in font.decode(bytes) {
            let width = glyph.width / 1000.0;
            let trm = text
                .glyph_matrix()
                .concat(&self.matrices.text)
                .concat(&self.state.ctm);

            let quad = Quad::new(
                trm.transform_point(Point::new(0.0, ascent)),
                trm.transform_point(Point::new(width, ascent)),
                trm.transform_point(Point::new(0.0, descent)),
                trm.transform_point(Point::new(width, descent)),
            );
            let size = trm.c.hypot(trm.d);

            self.chars.push(Char {
                text: glyph.text,
                fontname: font.name.clone(),
                size: if size > 0.0 { size } else { text.font_size.abs() },
                quad,
            });

            let mut tx = width * text.font_size + text.char_spacing;
            if glyph.is_word_space {
                tx += text.word_spacing;
            }
            self.matrices.advance(tx * text.h_scale());
        }
    }

    fn invoke_xobject(&mut self, name: &[u8], resources: &'a Dictionary, depth: usize) {
        let doc = self.doc;
        let xobject_name = String::from_utf8_lossy(name);
        let Some(stream) = get_dict(doc, resources, b"XObject")
            .and_then(|xobjects| xobjects.get(name).ok())
            .and_then(|obj| resolve(doc, obj).as_stream().ok())
        else {
            debug!(xobject = %xobject_name, "XObject not found");
            return;
        };

        if stream.dict.get(b"Subtype").and_then(Object::as_name).ok() != Some(b"Form".as_slice()) {
            return;
        }
        if depth >= MAX_FORM_DEPTH {
            warn!(xobject = %xobject_name, depth, "Form XObject nesting too deep, skipping");
            return;
        }

        let content = match decode_content_stream(stream) {
            Ok(content) => content,
            Err(e) => {
                warn!(xobject = %xobject_name, error = %e, "skipping unreadable Form XObject");
                return;
            }
        };
        let form_resources = get_dict(doc, &stream.dict, b"Resources").unwrap_or(resources);
        let matrix = stream
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|m| resolve(doc, m).as_array().ok())
            .and_then(|arr| matrix_operand(arr))
            .unwrap_or_default();

        let saved_state = self.state.clone();
        let saved_matrices = self.matrices;
        let stack_len = self.stack.len();
        self.state.ctm = matrix.concat(&self.state.ctm);

        self.run(&content, form_resources, depth + 1);

        self.stack.truncate(stack_len);
        self.state = saved_state;
        self.matrices = saved_matrices;
    }
}

fn number(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(|o| object_to_f64(o).ok())
}

fn set_number(operands: &[Object], target: &mut f64) {
    if let Some(value) = number(operands, 0) {
        *target = value;
    }
}

fn matrix_operand(operands: &[Object]) -> Option<Ctm> {
    let values: Vec<f64> = operands
        .iter()
        .map(|o| object_to_f64(o).ok())
        .collect::<Option<_>>()?;
    Ctm::from_slice(&values)
}

fn string_operand(obj: Option<&Object>) -> Option<&[u8]> {
    match obj {
        Some(Object::String(bytes, _)) => Some(bytes),
        _ => None,
    }
}
