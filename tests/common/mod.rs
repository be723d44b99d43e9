#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::header::HOST;
use hyper::{HeaderMap, Method, Request, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use siteserve::cli::Args;
use siteserve::config::{AppState, Config};
use siteserve::server;

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Lay out `<dir>/web` with an index page and two blog posts
pub fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let web = dir.path().join("web");
    std::fs::create_dir_all(web.join("blog")).unwrap();
    std::fs::write(web.join("index.html"), "<h1>home</h1>\n").unwrap();
    std::fs::write(web.join("blog").join("a.html"), "<p>a</p>").unwrap();
    std::fs::write(web.join("blog").join("b.html"), "<p>b</p>").unwrap();
    dir
}

pub fn slashed(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Configuration serving `<dir>/web` with the lister on `<dir>/web/blog/*`
pub fn config_for(dir: &Path) -> Config {
    let root = slashed(dir);
    let mut cfg = Config::load(&Args::default()).unwrap();
    cfg.server.port = 0;
    cfg.site.directory = format!("{root}/web");
    cfg.site.entries_pattern = format!("{root}/web/blog/*");
    cfg.site.entries_prefix = format!("{root}/web/");
    cfg
}

/// Run the server on an ephemeral loopback port for the rest of the test
pub async fn start(cfg: Config) -> SocketAddr {
    let addr = cfg.get_socket_addr().unwrap();
    let listener = server::create_listener(addr).unwrap();
    let local = listener.local_addr().unwrap();
    let state = Arc::new(AppState::new(cfg));
    tokio::spawn(server::run(listener, state, std::future::pending()));
    local
}

pub async fn send(addr: SocketAddr, method: Method, uri: &str, headers: &[(&str, &str)]) -> Reply {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .unwrap();
    tokio::spawn(conn);

    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(HOST, addr.to_string());
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let response = sender
        .send_request(builder.body(Empty::<Bytes>::new()).unwrap())
        .await
        .unwrap();

    let (parts, body) = response.into_parts();
    Reply {
        status: parts.status,
        headers: parts.headers,
        body: body.collect().await.unwrap().to_bytes(),
    }
}

pub async fn get(addr: SocketAddr, uri: &str) -> Reply {
    send(addr, Method::GET, uri, &[]).await
}
