use content_sources::SourceRecord;

/// External destination for giveaway call-to-action buttons
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockerRedirect {
    url: String,
}

impl LockerRedirect {
    pub const CTA_LABEL: &'static str = "Enter Giveaway";

    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The fixed giveaway catalogue, each entry pointing at the locker
    pub fn giveaways(&self) -> Vec<SourceRecord> {
        [
            ("$20 Roblox Gift Card", "Win a Roblox digital gift card."),
            ("1,000 V-Bucks", "Fortnite V-Bucks for skins & passes."),
            ("Gaming Headset", "Premium audio gaming headset."),
        ]
        .into_iter()
        .map(|(title, desc)| {
            SourceRecord::new("giveaways", title)
                .with_body(desc)
                .with_link(Some(self.url.clone()))
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_giveaways_link_to_locker() {
        let locker = LockerRedirect::new("https://locker.example/abc");
        let giveaways = locker.giveaways();
        assert_eq!(giveaways.len(), 3);
        assert!(giveaways
            .iter()
            .all(|g| g.link.as_deref() == Some("https://locker.example/abc")));
    }
}
