//! Integration tests for reading contracts from disk and over HTTP

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use scrivener_domain::traits::ContractReader;
use scrivener_reader::{FileReader, ReaderError};
use std::path::Path;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Write a one-page PDF; `page_rotate` / `tree_rotate` set /Rotate on the
/// page or on its parent node.
fn write_pdf(path: &Path, text: &str, page_rotate: Option<i64>, tree_rotate: Option<i64>) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));

    let mut page = dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    };
    if let Some(degrees) = page_rotate {
        page.set("Rotate", degrees);
    }
    let page_id = doc.add_object(page);

    let mut pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    if let Some(degrees) = tree_rotate {
        pages.set("Rotate", degrees);
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Answer one HTTP request with `body`; returns the URL of a `.txt` contract
async fn serve_once(body: Vec<u8>, with_length: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;

        let mut head = "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: close\r\n".to_string();
        if with_length {
            head.push_str(&format!("Content-Length: {}\r\n", body.len()));
        }
        head.push_str("\r\n");
        let _ = socket.write_all(head.as_bytes()).await;
        let _ = socket.write_all(&body).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{}/contracts/contract.txt", addr)
}

#[tokio::test]
async fn test_read_remote_text() {
    let url = serve_once(b"Employer: ACME GmbH".to_vec(), true).await;
    let text = FileReader::new().with_local_files(false).read(&url).await.unwrap();
    assert_eq!(text, "Employer: ACME GmbH");
}

#[tokio::test]
async fn test_declared_length_over_limit() {
    let url = serve_once(vec![b'a'; 4096], true).await;
    let result = FileReader::new().with_max_download_bytes(1024).read(&url).await;
    assert!(matches!(result, Err(ReaderError::TooLarge { limit: 1024, .. })));
}

#[tokio::test]
async fn test_streamed_body_over_limit() {
    let url = serve_once(vec![b'a'; 64 * 1024], false).await;
    let result = FileReader::new().with_max_download_bytes(1024).read(&url).await;
    assert!(matches!(result, Err(ReaderError::TooLarge { .. })));
}

#[tokio::test]
async fn test_read_plain_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("contract.txt");
    std::fs::write(&path, "Employer: ACME GmbH\nStart: 01.04.2023\n").unwrap();

    let reader = FileReader::new();
    let text = reader.read_contract(path.to_str().unwrap()).await.unwrap();
    assert!(text.contains("ACME GmbH"));
}

#[tokio::test]
async fn test_read_digital_pdf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("contract.pdf");
    write_pdf(&path, "Employer ACME GmbH", None, None);

    let text = FileReader::new().read(path.to_str().unwrap()).await.unwrap();
    assert!(text.contains("ACME"), "unexpected text: {:?}", text);
}

#[tokio::test]
async fn test_upside_down_page_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("upside_down.pdf");
    write_pdf(&path, "Employer ACME GmbH", Some(180), None);

    let result = FileReader::new().read(path.to_str().unwrap()).await;
    assert!(matches!(result, Err(ReaderError::RotationUnsupported { page: 1, .. })));
}

#[tokio::test]
async fn test_inherited_rotation_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inherited.pdf");
    write_pdf(&path, "Employer ACME GmbH", None, Some(-180));

    let result = FileReader::new().read(path.to_str().unwrap()).await;
    assert!(matches!(result, Err(ReaderError::RotationUnsupported { .. })));
}

#[tokio::test]
async fn test_quarter_turn_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("landscape.pdf");
    write_pdf(&path, "Employer ACME GmbH", Some(90), None);

    assert!(FileReader::new().read(path.to_str().unwrap()).await.is_ok());
}

#[tokio::test]
async fn test_image_is_unsupported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scan.png");
    std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

    let result = FileReader::new().read(path.to_str().unwrap()).await;
    assert!(matches!(result, Err(ReaderError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let result = FileReader::new().read("/definitely/not/here.txt").await;
    assert!(matches!(result, Err(ReaderError::Io(_))));
}
