use n8n_provision::NginxSite;
use n8n_provision::nginx::render;

#[test]
fn renders_proxy_site() {
    let site = NginxSite::new("n8n.example.com", 5678);

    let expected = "\
server {
    listen 80;
    server_name n8n.example.com;
    location / {
        proxy_pass http://localhost:5678;
        proxy_set_header Host $host;
        proxy_set_header X-Real-IP $remote_addr;
        proxy_set_header X-Forwarded-For $proxy_add_x_forwarded_for;
        proxy_set_header X-Forwarded-Proto $scheme;
        proxy_set_header Upgrade $http_upgrade;
        proxy_set_header Connection \"upgrade\";
        proxy_http_version 1.1;
        proxy_buffering off;
    }
}
";

    assert_eq!(render(&site), expected);
}

#[test]
fn upstream_port_follows_site() {
    let site = NginxSite::new("other.example.org", 8080);

    let result = render(&site);

    assert!(result.contains("server_name other.example.org;"));
    assert!(result.contains("proxy_pass http://localhost:8080;"));
    assert!(!result.contains("5678"));
}

#[test]
fn paths_keyed_by_domain() {
    let site = NginxSite::new("n8n.example.com", 5678);

    assert_eq!(
        site.available_path(),
        "/etc/nginx/sites-available/n8n.example.com"
    );
    assert_eq!(site.enabled_path(), "/etc/nginx/sites-enabled/n8n.example.com");
    assert_eq!(site.default_enabled_path(), "/etc/nginx/sites-enabled/default");
}
