mod common;

use std::collections::BTreeSet;

use hyper::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LOCATION};
use hyper::{Method, StatusCode};

use common::{config_for, get, send, site, start};

#[tokio::test]
async fn serves_index_html_with_inferred_type() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = get(addr, "/index.html").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "<h1>home</h1>\n");
    let content_type = reply.headers[CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"), "{content_type}");
}

#[tokio::test]
async fn serves_every_file_byte_for_byte() {
    let dir = site();
    let web = dir.path().join("web");
    let binary: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    std::fs::create_dir_all(web.join("img")).unwrap();
    std::fs::write(web.join("img").join("logo.bin"), &binary).unwrap();

    let addr = start(config_for(dir.path())).await;

    let reply = get(addr, "/img/logo.bin").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body.as_ref(), binary.as_slice());
    assert_eq!(reply.headers[CONTENT_TYPE], "application/octet-stream");

    let reply = get(addr, "/blog/a.html").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "<p>a</p>");
}

#[tokio::test]
async fn missing_file_is_404() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = get(addr, "/nope.html").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = get(addr, "/blog/nope/deeper.html").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blog_lists_entries_as_json() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = get(addr, "/blog").await;
    assert_eq!(reply.status, StatusCode::OK);

    let entries: Vec<String> = serde_json::from_slice(&reply.body).unwrap();
    let listed: BTreeSet<&str> = entries.iter().map(String::as_str).collect();
    assert_eq!(listed, BTreeSet::from(["blog/a.html", "blog/b.html"]));
    for entry in &entries {
        assert!(!entry.contains('\\'), "{entry}");
        assert!(!entry.starts_with("web/"), "{entry}");
    }
    assert!(!reply.body.ends_with(b"\n"));
}

#[tokio::test]
async fn blog_answers_any_method() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = send(addr, Method::POST, "/blog", &[]).await;
    assert_eq!(reply.status, StatusCode::OK);
    let entries: Vec<String> = serde_json::from_slice(&reply.body).unwrap();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn blog_reflects_directory_at_request_time() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let before: Vec<String> = serde_json::from_slice(&get(addr, "/blog").await.body).unwrap();
    assert_eq!(before.len(), 2);

    std::fs::write(dir.path().join("web").join("blog").join("c.html"), "<p>c</p>").unwrap();

    let after: Vec<String> = serde_json::from_slice(&get(addr, "/blog").await.body).unwrap();
    assert!(after.contains(&"blog/c.html".to_string()));
    assert_eq!(after.len(), 3);
}

#[tokio::test]
async fn blog_without_directory_is_generic_500() {
    let dir = site();
    std::fs::remove_dir_all(dir.path().join("web").join("blog")).unwrap();
    let addr = start(config_for(dir.path())).await;

    let reply = get(addr, "/blog").await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = std::str::from_utf8(&reply.body).unwrap();
    assert_eq!(message, "Error getting entries");
    assert!(!message.contains(&common::slashed(dir.path())));
}

#[tokio::test]
async fn traversal_cannot_leave_root() {
    let dir = site();
    std::fs::write(dir.path().join("secret.txt"), "top secret").unwrap();
    let addr = start(config_for(dir.path())).await;

    for uri in ["/../secret.txt", "/%2e%2e/secret.txt", "/blog/..%2f..%2fsecret.txt"] {
        let reply = get(addr, uri).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{uri}");
        assert_ne!(reply.body, "top secret");
    }
}

#[tokio::test]
async fn directory_without_slash_redirects() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = get(addr, "/blog/?x=1").await;
    assert_eq!(reply.status, StatusCode::OK);
    let listing = std::str::from_utf8(&reply.body).unwrap();
    assert!(listing.contains("<a href=\"a.html\">a.html</a>"));

    std::fs::create_dir_all(dir.path().join("web").join("about")).unwrap();
    std::fs::write(dir.path().join("web").join("about").join("index.html"), "about me").unwrap();

    let reply = get(addr, "/about?lang=en").await;
    assert_eq!(reply.status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(reply.headers[LOCATION], "/about/?lang=en");

    let reply = get(addr, "/about/").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "about me");
}

#[tokio::test]
async fn conditional_and_range_requests() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let first = get(addr, "/index.html").await;
    let etag = first.headers[ETAG].to_str().unwrap().to_owned();

    let cached = send(addr, Method::GET, "/index.html", &[("if-none-match", etag.as_str())]).await;
    assert_eq!(cached.status, StatusCode::NOT_MODIFIED);
    assert!(cached.body.is_empty());

    let partial = send(addr, Method::GET, "/index.html", &[("range", "bytes=0-3")]).await;
    assert_eq!(partial.status, StatusCode::PARTIAL_CONTENT);
    assert_eq!(partial.body, "<h1>");
    assert_eq!(partial.headers[CONTENT_RANGE], "bytes 0-3/14");

    let beyond = send(addr, Method::GET, "/index.html", &[("range", "bytes=100-")]).await;
    assert_eq!(beyond.status, StatusCode::RANGE_NOT_SATISFIABLE);
}

#[tokio::test]
async fn head_sends_headers_only() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = send(addr, Method::HEAD, "/index.html", &[]).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.headers[CONTENT_LENGTH], "14");
    assert!(reply.body.is_empty());
}

#[cfg(unix)]
#[tokio::test]
async fn symlink_out_of_root_is_404() {
    let dir = site();
    let secret = dir.path().join("secret.txt");
    std::fs::write(&secret, "top secret").unwrap();
    let web = dir.path().join("web");
    std::os::unix::fs::symlink(&secret, web.join("leak.txt")).unwrap();
    std::os::unix::fs::symlink(dir.path(), web.join("up")).unwrap();
    let addr = start(config_for(dir.path())).await;

    for uri in ["/leak.txt", "/up/secret.txt"] {
        let reply = get(addr, uri).await;
        assert_eq!(reply.status, StatusCode::NOT_FOUND, "{uri}");
        assert_ne!(reply.body, "top secret");
    }
}

#[tokio::test]
async fn undecodable_path_is_400() {
    let dir = site();
    let addr = start(config_for(dir.path())).await;

    let reply = get(addr, "/%ff.html").await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body, "invalid URL path");
}
