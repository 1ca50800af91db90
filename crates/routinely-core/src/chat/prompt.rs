//! Seed transcript for routine generation.

use routinely_types::chat::Message;
use routinely_types::product::Product;

/// System instruction sent with every routine request.
pub const SYSTEM_PROMPT: &str = "You are a helpful beauty expert. Create a personalized routine using the provided products. Only use the products listed.";

/// User prompt enumerating the selected products.
pub fn routine_prompt(products: &[Product]) -> String {
    let lines: Vec<String> = products.iter().map(Product::prompt_line).collect();
    format!(
        "Here are the selected products:\n{}\nPlease generate a step-by-step routine.",
        lines.join("\n")
    )
}

/// The two-message transcript a routine request starts from.
pub fn seed_transcript(products: &[Product]) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_PROMPT),
        Message::user(routine_prompt(products)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use routinely_types::chat::MessageRole;

    #[test]
    fn test_seed_transcript_lists_products() {
        let products = vec![
            Product {
                name: "Gel Cleanser".to_string(),
                brand: "La Roche-Posay".to_string(),
                category: "cleanser".to_string(),
                description: "For oily skin".to_string(),
                image: String::new(),
            },
            Product {
                name: "SPF 50".to_string(),
                brand: "Supergoop".to_string(),
                category: "suncare".to_string(),
                description: "Daily sunscreen".to_string(),
                image: String::new(),
            },
        ];

        let seed = seed_transcript(&products);
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].role, MessageRole::System);
        assert_eq!(seed[1].role, MessageRole::User);
        assert_eq!(
            seed[1].content,
            "Here are the selected products:\n\
             - Gel Cleanser (La Roche-Posay) [cleanser]: For oily skin\n\
             - SPF 50 (Supergoop) [suncare]: Daily sunscreen\n\
             Please generate a step-by-step routine."
        );
    }
}
