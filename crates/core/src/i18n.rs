//! Widget UI strings per language.
//!
//! Lookup order: requested language, then the default language, then the key itself.

pub const DEFAULT_LANGUAGE: &str = "en";
pub const AUTO: &str = "auto";

type Table = &'static [(&'static str, &'static str)];

const EN: Table = &[
    ("welcome", "Hi there! How can I help you today?"),
    ("input_placeholder", "Type your message..."),
    ("send", "Send"),
    ("typing", "Typing..."),
    ("powered_by", "Powered by"),
    ("book_appointment", "Book an appointment"),
    ("track_order", "Track my order"),
    ("talk_to_human", "Talk to a human"),
    ("close", "Close"),
];

const FR: Table = &[
    ("welcome", "Bonjour ! Comment puis-je vous aider aujourd'hui ?"),
    ("input_placeholder", "Écrivez votre message..."),
    ("send", "Envoyer"),
    ("typing", "En train d'écrire..."),
    ("powered_by", "Propulsé par"),
    ("book_appointment", "Prendre rendez-vous"),
    ("track_order", "Suivre ma commande"),
    ("talk_to_human", "Parler à un conseiller"),
    ("close", "Fermer"),
];

const ES: Table = &[
    ("welcome", "¡Hola! ¿En qué puedo ayudarte hoy?"),
    ("input_placeholder", "Escribe tu mensaje..."),
    ("send", "Enviar"),
    ("typing", "Escribiendo..."),
    ("powered_by", "Desarrollado por"),
    ("book_appointment", "Reservar una cita"),
    ("track_order", "Rastrear mi pedido"),
    ("talk_to_human", "Hablar con una persona"),
    ("close", "Cerrar"),
];

const DE: Table = &[
    ("welcome", "Hallo! Wie kann ich Ihnen heute helfen?"),
    ("input_placeholder", "Nachricht eingeben..."),
    ("send", "Senden"),
    ("typing", "Schreibt..."),
    ("powered_by", "Bereitgestellt von"),
    ("book_appointment", "Termin buchen"),
    ("track_order", "Bestellung verfolgen"),
    ("talk_to_human", "Mit einem Menschen sprechen"),
    ("close", "Schließen"),
];

// Partial table; missing keys come from the default language.
const PT: Table = &[
    ("welcome", "Olá! Como posso ajudar você hoje?"),
    ("send", "Enviar"),
    ("close", "Fechar"),
];

fn table(language: &str) -> Option<Table> {
    match language {
        "en" => Some(EN),
        "fr" => Some(FR),
        "es" => Some(ES),
        "de" => Some(DE),
        "pt" => Some(PT),
        _ => None,
    }
}

fn entry(table: Table, key: &str) -> Option<&'static str> {
    table.iter().find(|(candidate, _)| *candidate == key).map(|(_, value)| *value)
}

pub fn is_supported(language: &str) -> bool {
    table(&normalize(language)).is_some()
}

pub fn supported_languages() -> &'static [&'static str] {
    &["en", "fr", "es", "de", "pt"]
}

/// `fr-CA` and `FR` both resolve to `fr`.
fn normalize(language: &str) -> String {
    let trimmed = language.trim();
    let primary = trimmed.split(['-', '_']).next().unwrap_or(trimmed);
    primary.to_ascii_lowercase()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Localizer {
    default_language: String,
}

impl Default for Localizer {
    fn default() -> Self {
        Self { default_language: DEFAULT_LANGUAGE.to_string() }
    }
}

impl Localizer {
    /// Unsupported defaults fall back to English so the chain always ends in a real table.
    pub fn new(default_language: &str) -> Self {
        let normalized = normalize(default_language);
        if table(&normalized).is_some() {
            Self { default_language: normalized }
        } else {
            Self::default()
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn resolve_language(&self, language: &str) -> String {
        let normalized = normalize(language);
        if normalized.is_empty() || normalized == AUTO {
            self.default_language.clone()
        } else {
            normalized
        }
    }

    /// The language the widget will actually render in.
    pub fn locale(&self, language: &str) -> String {
        let resolved = self.resolve_language(language);
        if table(&resolved).is_some() {
            resolved
        } else {
            self.default_language.clone()
        }
    }

    pub fn text<'a>(&self, language: &str, key: &'a str) -> &'a str {
        let language = self.resolve_language(language);
        table(&language)
            .and_then(|requested| entry(requested, key))
            .or_else(|| table(&self.default_language).and_then(|fallback| entry(fallback, key)))
            .unwrap_or(key)
    }
}

pub fn text<'a>(language: &str, key: &'a str) -> &'a str {
    Localizer::default().text(language, key)
}

pub fn resolve_language(language: &str) -> String {
    Localizer::default().resolve_language(language)
}
