//! Command-line front end for the request facade.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI args ──▶ RequestOptions ──┐
//!                                 ▼
//!   defaults.toml ──▶ ConfigStore ──merge──▶ before-request ──▶ resolve
//!                                                                  │
//!                                                                  ▼
//!   stdout ◀── after-response ◀── interceptors ◀── ReqwestTransport
//!   stderr ◀── sink / on-error ◀──────────┘
//! ```
//!
//! # Commands
//! - `request`: send a request and print the response data as JSON
//! - `prepare`: print the URL a request would navigate to
//! - `proxy-host`: print the dev-proxy path for a base URL or domain

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};

use http_request::config::{load_defaults, ContentType, HttpMethod, RequestOptions};
use http_request::http::{HttpRequest, ReqwestTransport};
use http_request::observability::{logging, LogFormat};
use http_request::routing::{proxy_host, ProxyHostOptions};

#[derive(Parser)]
#[command(name = "http-request")]
#[command(about = "Resolve and send HTTP requests from declarative options", long_about = None)]
struct Cli {
    /// TOML file with default request options.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Diagnostic payload format (plain or json).
    #[arg(long, default_value = "plain")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request and print the response data
    Request {
        url: String,

        #[arg(short = 'X', long, default_value = "GET")]
        method: HttpMethod,

        #[arg(short, long)]
        base_url: Option<String>,

        /// Header as `Name: value`, repeatable.
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Query parameter as `key=value`, repeatable.
        #[arg(short, long = "param")]
        params: Vec<String>,

        /// JSON request body.
        #[arg(short, long)]
        data: Option<String>,

        #[arg(long)]
        content_type: Option<String>,

        /// Allow caching (no `t` timestamp).
        #[arg(long)]
        cache: bool,

        /// Route through the proxy URL.
        #[arg(long)]
        proxy: bool,

        #[arg(long)]
        proxy_url: Option<String>,

        /// Origin that relative (proxied) URLs are sent to.
        #[arg(long)]
        origin: Option<url::Url>,

        /// Log request and response payloads.
        #[arg(long)]
        dev: bool,
    },
    /// Print the URL a request would navigate to
    Prepare {
        url: Option<String>,

        #[arg(short, long)]
        base_url: Option<String>,

        #[arg(short, long = "param")]
        params: Vec<String>,

        /// Percent-encode the whole query string.
        #[arg(long)]
        encode: bool,

        #[arg(long)]
        proxy: bool,
    },
    /// Print the dev-proxy path for a base URL or domain
    ProxyHost {
        #[arg(short, long)]
        base_url: Option<String>,

        #[arg(long, default_value = "/proxy")]
        prefix: String,

        #[arg(long)]
        domain: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    logging::init(logging::DEFAULT_FILTER);
    let cli = Cli::parse();

    let defaults = match &cli.config {
        Some(path) => load_defaults(path)?,
        None => RequestOptions::default(),
    };

    match cli.command {
        Commands::Request {
            url,
            method,
            base_url,
            headers,
            params,
            data,
            content_type,
            cache,
            proxy,
            proxy_url,
            origin,
            dev,
        } => {
            let mut transport = ReqwestTransport::new();
            if let Some(origin) = origin {
                transport = transport.with_origin(origin);
            }
            let client = HttpRequest::builder()
                .defaults(defaults)
                .transport(Arc::new(transport))
                .log_format(cli.log_format)
                .build();

            let mut options = RequestOptions::new(url).method(method);
            options.base_url = base_url;
            options.params = parse_params(&params);
            for header in &headers {
                let (name, value) = header
                    .split_once(':')
                    .ok_or_else(|| format!("invalid header '{}', expected 'Name: value'", header))?;
                options = options.header(name.trim(), value.trim());
            }
            if let Some(data) = data {
                options = options.data(serde_json::from_str::<Value>(&data)?);
            }
            if let Some(content_type) = content_type {
                options = options.content_type(ContentType::from(content_type));
            }
            if cache {
                options = options.cache(true);
            }
            if proxy {
                options = options.enable_proxy(true);
            }
            if let Some(proxy_url) = proxy_url {
                options = options.proxy_url(proxy_url);
            }
            if dev {
                options = options.dev(true);
            }

            match client.request(options).await {
                Ok(data) => {
                    println!("{}", serde_json::to_string_pretty(&data)?);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Prepare {
            url,
            base_url,
            params,
            encode,
            proxy,
        } => {
            let client = HttpRequest::builder().defaults(defaults).build();
            let options = RequestOptions {
                url,
                base_url,
                params: parse_params(&params),
                enable_proxy: proxy.then_some(true),
                ..RequestOptions::default()
            };

            match client.prepare(&options, encode) {
                Some(url) => {
                    println!("{}", url);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("Error: a url or base url is required");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::ProxyHost {
            base_url,
            prefix,
            domain,
        } => {
            let options = RequestOptions {
                base_url: base_url.or(defaults.base_url),
                ..RequestOptions::default()
            };
            let props = ProxyHostOptions { prefix, domain };
            println!("{}", proxy_host(&options, &props));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `key=value` pairs; values that parse as JSON keep their type.
fn parse_params(pairs: &[String]) -> Option<Map<String, Value>> {
    if pairs.is_empty() {
        return None;
    }

    let mut params = Map::new();
    for pair in pairs {
        let (key, value) = pair.split_once('=').unwrap_or((pair.as_str(), ""));
        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        params.insert(key.to_string(), value);
    }
    Some(params)
}
