#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};
use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use poem::http::StatusCode;
use poem::listener::TcpAcceptor;
use poem::web::{Json, Path, Query};
use poem::{get, handler, IntoResponse, Response, Route, Server};
use serde_json::json;

pub const API_KEY: &str = "test-key";
pub const POSTER_BYTES: &[u8] = b"\xFF\xD8poster-bytes";

pub fn load(bytes: &[u8]) -> Document {
    Document::load_mem(bytes).expect("rendered PDF parses")
}

pub fn number(object: &Object) -> f64 {
    match object {
        Object::Integer(value) => *value as f64,
        Object::Real(value) => f64::from(*value),
        other => panic!("expected a number, found {:?}", other),
    }
}

pub fn page_ids(document: &Document) -> Vec<ObjectId> {
    document.get_pages().values().copied().collect()
}

pub fn first_page(document: &Document) -> ObjectId {
    *document
        .get_pages()
        .values()
        .next()
        .expect("document has a page")
}

#[derive(Debug)]
pub struct Link {
    pub rect: [f64; 4],
    pub uri: String,
}

impl Link {
    pub fn width(&self) -> f64 {
        self.rect[2] - self.rect[0]
    }
}

pub fn links_on_page(document: &Document, page_id: ObjectId) -> Vec<Link> {
    let page = document
        .get_object(page_id)
        .and_then(Object::as_dict)
        .expect("page dictionary");
    let Ok(annotations) = page.get(b"Annots") else {
        return Vec::new();
    };

    annotations
        .as_array()
        .expect("annotation array")
        .iter()
        .map(|entry| {
            let id = entry.as_reference().expect("annotation reference");
            let annotation = document
                .get_object(id)
                .and_then(Object::as_dict)
                .expect("annotation dictionary");
            let rect = annotation
                .get(b"Rect")
                .and_then(Object::as_array)
                .expect("annotation rect");
            let uri = annotation
                .get(b"A")
                .and_then(Object::as_dict)
                .and_then(|action| action.get(b"URI"))
                .and_then(Object::as_str)
                .expect("annotation URI");
            Link {
                rect: [
                    number(&rect[0]),
                    number(&rect[1]),
                    number(&rect[2]),
                    number(&rect[3]),
                ],
                uri: String::from_utf8_lossy(uri).into_owned(),
            }
        })
        .collect()
}

#[derive(Debug)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub text: Vec<u8>,
    pub color: [f64; 3],
}

#[derive(Debug)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

fn page_operations(document: &Document, page_id: ObjectId) -> Vec<lopdf::content::Operation> {
    let bytes = document.get_page_content(page_id).expect("page content");
    Content::decode(&bytes)
        .expect("decodable content stream")
        .operations
}

pub fn text_runs(document: &Document, page_id: ObjectId) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut position = (0.0, 0.0);
    let mut color = [0.0; 3];

    for operation in page_operations(document, page_id) {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "rg" => color = [number(&operands[0]), number(&operands[1]), number(&operands[2])],
            "Td" => position = (number(&operands[0]), number(&operands[1])),
            "Tj" => runs.push(TextRun {
                x: position.0,
                y: position.1,
                text: operands[0].as_str().expect("string operand").to_vec(),
                color,
            }),
            _ => {}
        }
    }

    runs
}

pub fn image_placements(document: &Document, page_id: ObjectId) -> Vec<Placement> {
    page_operations(document, page_id)
        .into_iter()
        .filter(|operation| operation.operator == "cm")
        .map(|operation| {
            let values: Vec<f64> = operation.operands.iter().map(number).collect();
            Placement {
                x: values[4],
                y: values[5],
                width: values[0],
                height: values[3],
            }
        })
        .collect()
}

/// Natural `(width, height)` of every image XObject referenced by the page.
pub fn image_xobjects(document: &Document, page_id: ObjectId) -> Vec<(i64, i64)> {
    let page = document
        .get_object(page_id)
        .and_then(Object::as_dict)
        .expect("page dictionary");
    let resources = page
        .get(b"Resources")
        .and_then(Object::as_dict)
        .expect("page resources");
    let Ok(xobjects) = resources.get(b"XObject").and_then(Object::as_dict) else {
        return Vec::new();
    };

    xobjects
        .iter()
        .map(|(_, reference)| {
            let id = reference.as_reference().expect("xobject reference");
            let stream = document
                .get_object(id)
                .and_then(Object::as_stream)
                .expect("image stream");
            let width = stream.dict.get(b"Width").and_then(Object::as_i64);
            let height = stream.dict.get(b"Height").and_then(Object::as_i64);
            (width.expect("image width"), height.expect("image height"))
        })
        .collect()
}

pub fn jpeg_fixture(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([180, 40, 60])));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Jpeg(85))
        .expect("encode JPEG fixture");
    bytes
}

fn authorized(params: &HashMap<String, String>) -> bool {
    params.get("api_key").map(String::as_str) == Some(API_KEY)
}

#[handler]
fn popular(Query(params): Query<HashMap<String, String>>) -> Response {
    if !authorized(&params) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({
        "page": 1,
        "results": [
            {"id": 3, "title": "C", "release_date": "2022-01-01", "vote_average": 5.5},
            {"id": 1, "title": "A", "release_date": "2020-01-01", "vote_average": 7.1},
            {"id": 2, "title": "B", "release_date": "2021-01-01", "vote_average": 8.0,
             "poster_path": "/b.jpg"}
        ]
    }))
    .into_response()
}

#[handler]
fn movie(Path(id): Path<String>, Query(params): Query<HashMap<String, String>>) -> Response {
    if !authorized(&params) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match id.as_str() {
        "550" => Json(json!({
            "id": 550,
            "title": "Fight Club",
            "release_date": "1999-10-15",
            "vote_average": 8.4,
            "poster_path": "/fight-club.jpg"
        }))
        .into_response(),
        "551" => Json(json!({
            "id": 551,
            "title": "No Poster",
            "release_date": "2001-01-01",
            "vote_average": 6.0,
            "poster_path": null
        }))
        .into_response(),
        "552" => Json(json!({"unexpected": true})).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

#[handler]
fn poster(Path(file): Path<String>) -> Response {
    match file.as_str() {
        "fight-club.jpg" => Response::builder()
            .content_type("image/jpeg")
            .body(jpeg_fixture(60, 90)),
        "raw.jpg" => Response::builder()
            .content_type("image/jpeg")
            .body(POSTER_BYTES),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Starts a catalog stand-in on an ephemeral port and returns its base address.
pub async fn spawn_upstream() -> String {
    let app = Route::new()
        .at("/3/movie/popular", get(popular))
        .at("/3/movie/:id", get(movie))
        .at("/t/p/w500/:file", get(poster));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind upstream listener");
    let address = listener.local_addr().expect("upstream address");
    let acceptor = TcpAcceptor::from_tokio(listener).expect("wrap upstream listener");
    tokio::spawn(Server::new_with_acceptor(acceptor).run(app));

    format!("http://{}", address)
}

pub fn upstream_config(base: &str) -> movie_reports::ServiceConfig {
    movie_reports::ServiceConfig::new(API_KEY)
        .with_api_base_url(format!("{}/3", base))
        .with_image_base_url(format!("{}/t/p", base))
}
