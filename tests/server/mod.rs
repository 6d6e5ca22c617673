use actix_web::{App, HttpResponse, HttpServer, web};

/// The landing page used by the end-to-end scenario
#[allow(dead_code)]
pub const DEMO_PAGE: &str =
    r#"<html><head><title>Demo</title></head><body><img src="a.jpg"></body></html>"#;

/// A page that passes every local check
#[allow(dead_code)]
pub const HEALTHY_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Healthy Page</title>
    <meta name="description" content="A page with every tag in place">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <link rel="canonical" href="https://example.com/">
    <meta property="og:title" content="Healthy Page">
    <meta name="twitter:card" content="summary">
</head>
<body>
    <h1>Healthy Page</h1>
    <img src="/a.png" alt="A">
    <a href="/one">One</a>
    <a href="/two">Two</a>
    <a href="/three">Three</a>
    <a href="/four">Four</a>
    <a href="/five">Five</a>
    <a href="https://www.facebook.com/example">Facebook</a>
</body>
</html>"#;

/// Starts an actix server on an ephemeral port and returns its base URL.
#[allow(dead_code)]
pub async fn spawn_server<F>(configure: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
{
    let http_server = HttpServer::new(move || App::new().configure(configure.clone()))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind test server");

    let addr = http_server
        .addrs()
        .first()
        .cloned()
        .expect("No address bound");
    let url = format!("http://{}", addr);

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    url
}

/// A small website: one landing page plus optional robots.txt and sitemap.xml.
#[derive(Debug, Clone, Copy)]
#[allow(dead_code)]
pub struct Site {
    pub page: &'static str,
    pub page_status: u16,
    pub robots: bool,
    pub sitemap: bool,
}

#[allow(dead_code)]
impl Site {
    pub fn serving(page: &'static str) -> Self {
        Self {
            page,
            page_status: 200,
            robots: true,
            sitemap: true,
        }
    }

    pub fn configure(self) -> impl Fn(&mut web::ServiceConfig) + Send + Clone + 'static {
        move |cfg: &mut web::ServiceConfig| {
            let site = self;
            cfg.route(
                "/",
                web::get().to(move || async move {
                    let status = actix_web::http::StatusCode::from_u16(site.page_status)
                        .unwrap_or(actix_web::http::StatusCode::OK);
                    HttpResponse::build(status)
                        .content_type("text/html; charset=utf-8")
                        .body(site.page)
                }),
            );
            if site.robots {
                cfg.route(
                    "/robots.txt",
                    web::get().to(|| async {
                        HttpResponse::Ok()
                            .content_type("text/plain")
                            .body("User-agent: *\nAllow: /\n")
                    }),
                );
            }
            if site.sitemap {
                cfg.route(
                    "/sitemap.xml",
                    web::get().to(|| async {
                        HttpResponse::Ok()
                            .content_type("application/xml")
                            .body("<urlset></urlset>")
                    }),
                );
            }
        }
    }
}

/// Starts a [`Site`] and returns its base URL.
#[allow(dead_code)]
pub async fn spawn_site(site: Site) -> String {
    spawn_server(site.configure()).await
}
