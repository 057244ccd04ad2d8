/// Defines the application container: image, environment, data
/// directory, published port, and health endpoint.
///
/// # Example
///
/// ```
/// use n8n_provision::App;
///
/// let app = App::n8n("flows.example.com");
///
/// assert_eq!(app.name, "n8n");
/// assert_eq!(app.port, 5678);
/// assert!(app.env.contains(&("N8N_HOST".into(), "flows.example.com".into())));
/// ```
#[derive(Debug, Clone)]
pub struct App {
    pub name: String,
    pub image: String,
    pub port: u16,
    /// Host address the port is published on.
    pub bind_address: String,
    pub base_dir: String,
    pub data_dir: String,
    pub container_data_path: String,
    /// uid:gid the image runs as; the data directory is chowned to it.
    pub data_owner: String,
    pub env: Vec<(String, String)>,
    pub health_path: String,
    pub restart: String,
}

impl App {
    #[must_use]
    pub fn new(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            port: 80,
            bind_address: "127.0.0.1".to_string(),
            base_dir: format!("/opt/{name}"),
            data_dir: format!("/opt/{name}/data"),
            container_data_path: "/data".to_string(),
            data_owner: "1000:1000".to_string(),
            env: Vec::new(),
            health_path: "/".to_string(),
            restart: "unless-stopped".to_string(),
        }
    }

    /// The n8n container bound to `domain`, so generated webhook and
    /// editor links use the public HTTPS URL.
    #[must_use]
    pub fn n8n(domain: &str) -> Self {
        let url = format!("https://{domain}/");
        Self::new("n8n", "docker.n8n.io/n8nio/n8n")
            .port(5678)
            .container_data_path("/home/node/.n8n")
            .health_path("/healthz")
            .env("N8N_HOST", domain)
            .env("N8N_PORT", "5678")
            .env("N8N_PROTOCOL", "https")
            .env("WEBHOOK_URL", &url)
            .env("N8N_EDITOR_BASE_URL", &url)
            .env("NODE_ENV", "production")
    }

    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn bind_address(mut self, addr: &str) -> Self {
        self.bind_address = addr.to_string();
        self
    }

    /// Set the host directory holding the compose file; the data
    /// directory moves underneath it.
    #[must_use]
    pub fn base_dir(mut self, dir: &str) -> Self {
        self.base_dir = dir.to_string();
        self.data_dir = format!("{dir}/data");
        self
    }

    #[must_use]
    pub fn container_data_path(mut self, path: &str) -> Self {
        self.container_data_path = path.to_string();
        self
    }

    #[must_use]
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn health_path(mut self, path: &str) -> Self {
        self.health_path = path.to_string();
        self
    }

    #[must_use]
    pub fn compose_file(&self) -> String {
        format!("{}/docker-compose.yml", self.base_dir)
    }

    #[must_use]
    pub fn health_url(&self) -> String {
        format!("http://localhost:{}{}", self.port, self.health_path)
    }
}
