use axum::{
    body::Body,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        Response, StatusCode,
    },
    routing::get,
    serve, Router,
};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use tokio::net::TcpListener;

#[derive(Clone)]
pub enum Route {
    /// 200 with a `Content-Length` header.
    Sized(Vec<u8>),
    /// 200 with a chunked body and no announced length.
    Streamed(Vec<u8>),
    Status(u16),
}

impl Route {
    fn respond(self) -> Response<Body> {
        match self {
            Route::Sized(body) => Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, "application/octet-stream")
                .header(CONTENT_LENGTH, body.len())
                .body(Body::from(body))
                .unwrap(),
            Route::Streamed(body) => {
                let chunks: Vec<Result<Vec<u8>, std::io::Error>> =
                    body.chunks(4096).map(|c| Ok(c.to_vec())).collect();
                Response::builder()
                    .status(StatusCode::OK)
                    .header(CONTENT_TYPE, "application/octet-stream")
                    .body(Body::from_stream(futures_util::stream::iter(chunks)))
                    .unwrap()
            }
            Route::Status(status) => Response::builder()
                .status(StatusCode::from_u16(status).unwrap())
                .body(Body::empty())
                .unwrap(),
        }
    }
}

/// Local HTTP server on an ephemeral port, running on its own runtime thread.
///
/// Only GET is routed; every handled request counts as a hit, including
/// requests for unknown paths, which get a 404.
pub struct TestHttpServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl TestHttpServer {
    pub fn spawn(routes: Vec<(&str, Route)>) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));

        let mut router = Router::new();
        for (path, route) in routes {
            let hits = hits.clone();
            router = router.route(
                path,
                get(move || {
                    let route = route.clone();
                    hits.fetch_add(1, Ordering::SeqCst);
                    async move { route.respond() }
                }),
            );
        }
        let router = router.fallback({
            let hits = hits.clone();
            move || {
                hits.fetch_add(1, Ordering::SeqCst);
                async { Route::Status(404).respond() }
            }
        });

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                serve(listener, router).await.unwrap();
            });
        });

        Self {
            addr: rx.recv().unwrap(),
            hits,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}
