/// Utilitários para logar valores sensíveis (codes, tokens) sem expô-los

/// Trunca uma string sem cortar um caractere UTF-8 ao meio
pub fn truncate_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

/// Mascara um segredo para log: mantém só o prefixo
///
/// Segredos curtos (até 8 bytes) são totalmente ocultados.
pub fn mask_secret(secret: &str) -> String {
    if secret.len() <= 8 {
        return "***".to_string();
    }
    format!("{}...", truncate_safe(secret, 8))
}
