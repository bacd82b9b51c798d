use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

/// Renders the header block.
///
/// Field order and spacing are fixed: `Last-modified:` and `Content-type:`
/// have no space after the colon, `Content-length:` has one.
pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut head = format!(
        "{} {}\r\nServer: {}\r\n",
        resp.version,
        resp.status.line(),
        resp.server
    );

    if let (Some(modified), Some(ctype), Some(len)) =
        (&resp.last_modified, resp.content_type, resp.content_length)
    {
        head.push_str(&format!(
            "Last-modified:{}\r\nContent-type:{}\r\nContent-length: {}\r\n",
            modified, ctype, len
        ));
    }

    head.push_str("\r\n");
    head.into_bytes()
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    /// Writes the header block, retrying partial writes until all of it is
    /// out.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}

/// Sends a complete response: header block, then the file body when the
/// response carries one.
pub async fn send_response<W>(response: &Response, stream: &mut W) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    ResponseWriter::new(response).write_to_stream(stream).await?;

    if let Some(path) = &response.file_path {
        let mut file = tokio::fs::File::open(path).await?;
        let sent = tokio::io::copy(&mut file, stream).await?;
        stream.flush().await?;
        tracing::trace!(path = %path.display(), bytes = sent, "file sent");
    }

    Ok(())
}
