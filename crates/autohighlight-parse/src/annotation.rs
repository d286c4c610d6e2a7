//! Highlight annotation writer.
//!
//! Builds `/Subtype /Highlight` markup annotations with an explicit
//! appearance stream and attaches them to a page's `/Annots` array.

use autohighlight_core::{BBox, HighlightColor, Quad};
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat, dictionary};
use tracing::trace;

use crate::error::BackendError;

/// Annotation flag bit 3: print the annotation with the page.
const FLAG_PRINT: i64 = 4;

/// Add one highlight annotation covering `quads` to the page `page_id`.
///
/// Returns the object id of the new annotation dictionary.
pub fn add_highlight(
    doc: &mut lopdf::Document,
    page_id: ObjectId,
    quads: &[Quad],
    color: HighlightColor,
) -> Result<ObjectId, BackendError> {
    let rect = quads
        .iter()
        .map(Quad::rect)
        .reduce(|a, b| a.union(&b))
        .ok_or_else(|| BackendError::Annotation("highlight needs at least one quad".into()))?;

    if !matches!(doc.get_object(page_id), Ok(Object::Dictionary(_))) {
        return Err(BackendError::Annotation(format!(
            "page object {} {} R is not a dictionary",
            page_id.0, page_id.1
        )));
    }

    let sequence = annotation_count(doc, page_id);
    let appearance_id = doc.add_object(appearance_stream(&rect, quads, color));

    let [r, g, b] = color.rgb();
    let annot = dictionary! {
        "Type" => "Annot",
        "Subtype" => "Highlight",
        "Rect" => rect_array(&rect),
        "QuadPoints" => quads
            .iter()
            .flat_map(|q| q.to_quad_points())
            .map(real)
            .collect::<Vec<Object>>(),
        "C" => vec![Object::Real(r), Object::Real(g), Object::Real(b)],
        "F" => FLAG_PRINT,
        "P" => page_id,
        "NM" => Object::String(
            format!("autohighlight-{}-{}-{}", page_id.0, page_id.1, sequence).into_bytes(),
            StringFormat::Literal,
        ),
        "AP" => dictionary! { "N" => appearance_id },
    };
    let annot_id = doc.add_object(annot);
    attach_to_page(doc, page_id, annot_id)?;

    trace!(
        page = ?page_id,
        annot = ?annot_id,
        quads = quads.len(),
        color = %color,
        "added highlight annotation"
    );
    Ok(annot_id)
}

/// Form XObject painting the quads with a multiply blend.
fn appearance_stream(rect: &BBox, quads: &[Quad], color: HighlightColor) -> Stream {
    let [r, g, b] = color.rgb();
    let mut content = format!("q /H gs {r} {g} {b} rg\n");
    for quad in quads {
        let [ul, ur, ll, lr] = quad.corners();
        content.push_str(&format!(
            "{} {} m {} {} l {} {} l {} {} l h\n",
            fmt_num(ul.x),
            fmt_num(ul.y),
            fmt_num(ur.x),
            fmt_num(ur.y),
            fmt_num(lr.x),
            fmt_num(lr.y),
            fmt_num(ll.x),
            fmt_num(ll.y),
        ));
    }
    content.push_str("f Q\n");

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "FormType" => 1i64,
        "BBox" => rect_array(rect),
        "Resources" => dictionary! {
            "ExtGState" => dictionary! {
                "H" => dictionary! {
                    "Type" => "ExtGState",
                    "BM" => "Multiply",
                },
            },
        },
    };
    Stream::new(dict, content.into_bytes())
}

fn fmt_num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

fn rect_array(rect: &BBox) -> Vec<Object> {
    vec![real(rect.x0), real(rect.y0), real(rect.x1), real(rect.y1)]
}

fn annotation_count(doc: &lopdf::Document, page_id: ObjectId) -> usize {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return 0;
    };
    match page.get(b"Annots") {
        Ok(Object::Array(arr)) => arr.len(),
        Ok(Object::Reference(id)) => doc
            .get_object(*id)
            .and_then(Object::as_array)
            .map_or(0, Vec::len),
        _ => 0,
    }
}

/// Append `annot_id` to the page's `/Annots`, following an indirect array.
fn attach_to_page(
    doc: &mut lopdf::Document,
    page_id: ObjectId,
    annot_id: ObjectId,
) -> Result<(), BackendError> {
    let indirect = match doc.get_dictionary(page_id)?.get(b"Annots") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    if let Some(array_id) = indirect {
        if let Ok(Object::Array(arr)) = doc.get_object_mut(array_id) {
            arr.push(Object::Reference(annot_id));
            return Ok(());
        }
    }

    let page: &mut Dictionary = doc.get_dictionary_mut(page_id)?;
    if let Ok(Object::Array(arr)) = page.get_mut(b"Annots") {
        arr.push(Object::Reference(annot_id));
    } else {
        page.set("Annots", vec![Object::Reference(annot_id)]);
    }
    Ok(())
}
