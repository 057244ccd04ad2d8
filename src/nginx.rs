/// Where nginx keeps its site definitions, and which site ships
/// enabled by default.
///
/// # Example
///
/// ```
/// use n8n_provision::NginxSite;
///
/// let site = NginxSite::new("flows.example.com", 5678);
///
/// assert_eq!(site.available_path(), "/etc/nginx/sites-available/flows.example.com");
/// assert_eq!(site.enabled_path(), "/etc/nginx/sites-enabled/flows.example.com");
/// ```
#[derive(Debug, Clone)]
pub struct NginxSite {
    pub domain: String,
    pub upstream_port: u16,
    pub sites_available: String,
    pub sites_enabled: String,
    pub default_site: String,
}

impl NginxSite {
    #[must_use]
    pub fn new(domain: &str, upstream_port: u16) -> Self {
        Self {
            domain: domain.to_string(),
            upstream_port,
            sites_available: "/etc/nginx/sites-available".to_string(),
            sites_enabled: "/etc/nginx/sites-enabled".to_string(),
            default_site: "default".to_string(),
        }
    }

    #[must_use]
    pub fn sites_dir(mut self, available: &str, enabled: &str) -> Self {
        self.sites_available = available.to_string();
        self.sites_enabled = enabled.to_string();
        self
    }

    #[must_use]
    pub fn available_path(&self) -> String {
        format!("{}/{}", self.sites_available, self.domain)
    }

    #[must_use]
    pub fn enabled_path(&self) -> String {
        format!("{}/{}", self.sites_enabled, self.domain)
    }

    #[must_use]
    pub fn default_enabled_path(&self) -> String {
        format!("{}/{}", self.sites_enabled, self.default_site)
    }
}

/// Render the plain-HTTP virtual host proxying `domain` to the
/// local application port. certbot later rewrites it in place to
/// add the TLS listener and redirect.
#[must_use]
pub fn render(site: &NginxSite) -> String {
    format!(
        "server {{
    listen 80;
    server_name {domain};
    location / {{
        proxy_pass http://localhost:{port};
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
        proxy_set_header Upgrade $http_upgrade;
        proxy_set_header Connection \"upgrade\";
        proxy_http_version 1.1;
        proxy_buffering off;
    }}
}}
",
        domain = site.domain,
        port = site.upstream_port,
    )
}
