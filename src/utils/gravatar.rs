use md5::{Md5, Digest};

/// Construit l'URL gravatar d'un email (minuscules, espaces retirés, MD5 hex)
pub fn gravatar_url(email: &str, size: u32) -> String {
    let normalized = email.trim().to_lowercase();
    let mut hasher = Md5::new();
    hasher.update(normalized.as_bytes());
    let digest = hasher.finalize();

    let hash: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    format!(
        "https://www.gravatar.com/avatar/{}?s={}&d=identicon&r=g",
        hash, size
    )
}
