//! Argv and URL validation shared by both transports.

use crate::errors::{TransportError, TransportResult};
use std::net::IpAddr;
use tokio::net::lookup_host;

const SHELL_METACHARACTERS: &[char] = &[';', '&', '|', '$', '`', '(', ')', '<', '>'];

const DANGEROUS_PREFIXES: &[&str] = &["--exec", "--config=", "-c="];

const BLOCKED_HOSTNAMES: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    "local",
    "internal",
    "metadata",
    "metadata.google.internal",
    "instance-data",
    "169.254.169.254",
    "metadata.azure.com",
    "kubernetes",
    "kubernetes.default",
    "kubernetes.default.svc",
    "kubernetes.default.svc.cluster.local",
];

/// Validate a stdio command and its arguments against shell metacharacters
/// and argument-injection prefixes before a process is ever spawned.
pub fn validate_command(command: &str, args: &[String]) -> TransportResult<()> {
    if command.trim().is_empty() {
        return Err(TransportError::InvalidCommand("command is empty".into()));
    }

    let tokens = std::iter::once(command).chain(args.iter().map(String::as_str));
    for token in tokens {
        if token.chars().any(|c| SHELL_METACHARACTERS.contains(&c)) {
            return Err(TransportError::InvalidCommand(format!(
                "token '{token}' contains invalid characters"
            )));
        }
    }

    for arg in args {
        let lower = arg.to_ascii_lowercase();
        if DANGEROUS_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            return Err(TransportError::InvalidCommand(format!(
                "argument '{arg}' is not permitted"
            )));
        }
    }

    Ok(())
}

fn hostname_is_blocked(hostname: &str, allow_list: Option<&[String]>) -> bool {
    let lower = hostname.to_ascii_lowercase();
    if let Some(allowed) = allow_list {
        return !allowed.iter().any(|h| h.eq_ignore_ascii_case(&lower));
    }
    BLOCKED_HOSTNAMES
        .iter()
        .any(|blocked| lower == *blocked || lower.ends_with(&format!(".{blocked}")))
}

fn ip_is_public(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            !(v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_unspecified()
                || v4.is_multicast()
                || v4.is_broadcast())
        }
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return ip_is_public(&IpAddr::V4(mapped));
            }
            !(v6.is_loopback() || v6.is_unspecified() || v6.is_multicast() || is_unique_local(v6))
        }
    }
}

fn is_unique_local(v6: &std::net::Ipv6Addr) -> bool {
    (v6.segments()[0] & 0xfe00) == 0xfc00
}

/// Validate an SSE/HTTP server URL against scheme, hostname blocklist (or
/// allow-list), and DNS-resolved-IP public-ness, to prevent SSRF.
pub async fn validate_url(url: &str, allow_list: Option<&[String]>) -> TransportResult<url::Url> {
    let parsed = url::Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(TransportError::InvalidUrl(format!(
                "unsupported scheme '{other}'"
            )))
        }
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| TransportError::InvalidUrl("url has no host".into()))?;
    if host.is_empty() {
        return Err(TransportError::InvalidUrl("url has empty host".into()));
    }

    if hostname_is_blocked(host, allow_list) {
        return Err(TransportError::InvalidUrl(format!(
            "host '{host}' is internal/metadata and not permitted"
        )));
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        if !ip_is_public(&ip) {
            return Err(TransportError::InvalidUrl(format!(
                "host '{host}' resolves to a non-public address"
            )));
        }
        return Ok(parsed);
    }

    let port = parsed.port_or_known_default().unwrap_or(443);
    let addrs = lookup_host((host, port))
        .await
        .map_err(|e| TransportError::InvalidUrl(format!("dns lookup failed: {e}")))?;

    let mut saw_any = false;
    for addr in addrs {
        saw_any = true;
        if !ip_is_public(&addr.ip()) {
            return Err(TransportError::InvalidUrl(format!(
                "host '{host}' resolves to a non-public address"
            )));
        }
    }
    if !saw_any {
        return Err(TransportError::InvalidUrl(format!(
            "host '{host}' did not resolve to any address"
        )));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_shell_metacharacters() {
        let err = validate_command("sh", &["-c".into(), "ls;rm".into()]).unwrap_err();
        assert!(matches!(err, TransportError::InvalidCommand(_)));
    }

    #[test]
    fn rejects_empty_command() {
        assert!(validate_command("", &[]).is_err());
    }

    #[test]
    fn rejects_dangerous_prefixes() {
        let err = validate_command("node", &["--exec=rm -rf".into()]).unwrap_err();
        assert!(matches!(err, TransportError::InvalidCommand(_)));
        let err = validate_command("node", &["--config=/etc/passwd".into()]).unwrap_err();
        assert!(matches!(err, TransportError::InvalidCommand(_)));
    }

    #[test]
    fn accepts_ordinary_command() {
        assert!(validate_command("npx", &["-y".into(), "@foo/bar".into()]).is_ok());
    }

    #[tokio::test]
    async fn rejects_metadata_ip_literal() {
        let err = validate_url("http://169.254.169.254/", None).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn rejects_blocked_hostname() {
        let err = validate_url("http://metadata.google.internal/compute", None)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn rejects_non_http_scheme() {
        let err = validate_url("ftp://example.com/", None).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn allow_list_rejects_unlisted_host() {
        let allow = vec!["example.com".to_string()];
        let err = validate_url("https://attacker.example.org/", Some(&allow))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl(_)));
    }
}
