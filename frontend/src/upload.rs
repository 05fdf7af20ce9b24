//! HTTP side channel for file contents. Only the resulting metadata travels
//! over the socket, as the FileUpload widget's `uploaded` event.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use shared::FileDescriptor;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_UPLOAD_PATH: &str = "/upload";

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

pub fn upload_url(origin: &str, upload_path: &str) -> String {
    let path = if upload_path.is_empty() {
        DEFAULT_UPLOAD_PATH
    } else {
        upload_path
    };
    format!(
        "{}/{}",
        origin.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// MIME type from the file extension; unknown extensions are octet streams.
pub fn guess_mime(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "txt" | "log" => "text/plain",
        "csv" => "text/csv",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

pub fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(UPLOAD_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// A file read from disk, ready to be checked against a widget and posted.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub descriptor: FileDescriptor,
    bytes: Vec<u8>,
}

pub async fn read_file(path: &Path) -> Result<LocalFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("No usable file name in {}", path.display()))?
        .to_string();
    let descriptor = FileDescriptor {
        size: bytes.len() as u64,
        mime: guess_mime(&filename).to_string(),
        filename,
    };
    Ok(LocalFile { descriptor, bytes })
}

/// POSTs the file as multipart field `file` and returns the descriptor the
/// widget reports.
pub async fn upload_file(
    client: &reqwest::Client,
    origin: &str,
    upload_path: &str,
    file: LocalFile,
) -> Result<FileDescriptor> {
    let LocalFile { descriptor, bytes } = file;
    let part = Part::bytes(bytes)
        .file_name(descriptor.filename.clone())
        .mime_str(&descriptor.mime)
        .context("Invalid MIME type")?;
    let url = upload_url(origin, upload_path);
    client
        .post(&url)
        .multipart(Form::new().part("file", part))
        .send()
        .await
        .with_context(|| format!("Upload to {url} failed"))?
        .error_for_status()
        .with_context(|| format!("Upload to {url} was rejected"))?;

    log::info!("Uploaded {} ({} bytes)", descriptor.filename, descriptor.size);
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn test_upload_url() {
        assert_eq!(upload_url("http://localhost:8000", "/upload"), "http://localhost:8000/upload");
        assert_eq!(upload_url("http://localhost:8000/", "files"), "http://localhost:8000/files");
        assert_eq!(upload_url("https://example.com", ""), "https://example.com/upload");
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime("report.CSV"), "text/csv");
        assert_eq!(guess_mime("photo.jpeg"), "image/jpeg");
        assert_eq!(guess_mime("archive.tar.gz"), "application/octet-stream");
        assert_eq!(guess_mime("README"), "application/octet-stream");
    }

    /// Reads one HTTP request and answers with `status`.
    async fn answer_one(listener: TcpListener, status: &str) -> String {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buffer = [0u8; 4096];
        loop {
            let read = stream.read(&mut buffer).await.unwrap();
            if read == 0 {
                break;
            }
            request.extend_from_slice(&buffer[..read]);
            if request_complete(&request) {
                break;
            }
        }
        let response = format!("HTTP/1.1 {status}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        stream.write_all(response.as_bytes()).await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some((head, body)) = text.split_once("\r\n\r\n") else {
            return false;
        };
        let length = head.lines().find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        });
        match length {
            Some(length) => body.len() >= length,
            None => body.ends_with("--\r\n") || body.ends_with("\r\n0\r\n\r\n"),
        }
    }

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("appui-upload-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_read_file_describes_contents() {
        let path = temp_file("notes.md", "# hi\n");
        let file = read_file(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            file.descriptor,
            FileDescriptor {
                filename: "notes.md".to_string(),
                size: 5,
                mime: "text/markdown".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let error = read_file(Path::new("/definitely/not/here.csv")).await.unwrap_err();
        assert!(error.to_string().contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_upload_posts_multipart_file_field() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(answer_one(listener, "200 OK"));

        let path = temp_file("data.csv", "a,b\n1,2\n");
        let file = read_file(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let client = http_client().unwrap();
        let descriptor = upload_file(&client, &origin, "files", file).await.unwrap();
        assert_eq!(descriptor.filename, "data.csv");
        assert_eq!(descriptor.size, 8);
        assert_eq!(descriptor.mime, "text/csv");

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /files HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data; boundary="));
        assert!(request.contains(r#"name="file"; filename="data.csv""#));
        assert!(request.to_ascii_lowercase().contains("content-type: text/csv"));
        assert!(request.contains("a,b\n1,2\n"));
    }

    #[tokio::test]
    async fn test_rejected_upload_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let origin = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(answer_one(listener, "413 Payload Too Large"));

        let path = temp_file("big.bin", "xyz");
        let file = read_file(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let client = http_client().unwrap();
        let error = upload_file(&client, &origin, DEFAULT_UPLOAD_PATH, file)
            .await
            .unwrap_err();
        assert!(error.to_string().contains("was rejected"));
        server.await.unwrap();
    }
}
