//! Mock image host backed by mockito.

use mockito::{Mock, Server, ServerGuard};

pub struct ImageHost {
    pub server: ServerGuard,
}

impl ImageHost {
    pub async fn start() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    /// Serve `body` at `path` with an image/png content type
    pub async fn serve(&mut self, path: &str, body: Vec<u8>) -> Mock {
        self.server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(body)
            .create_async()
            .await
    }

    pub async fn fail(&mut self, path: &str, status: usize) -> Mock {
        self.server
            .mock("GET", path)
            .with_status(status)
            .create_async()
            .await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.url(), path)
    }
}
