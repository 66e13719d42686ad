use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Word;
use fake::Fake;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rust_decimal::Decimal;
use tracing::info;

use crate::config::GenerationConfig;

/// German GS1 prefix.
pub const EAN_PREFIX: &str = "400";
pub const HOUSE_BRAND: &str = "Eigenmarke";
pub const UNIT_SIZES: [&str; 6] = ["250g", "500g", "1kg", "1L", "500ml", "100g"];
pub const VAT_STANDARD: f64 = 0.19;
pub const VAT_REDUCED: f64 = 0.07;
pub const ACTIVE_PROBABILITY: f64 = 0.95;
pub const BRANDED_PROBABILITY: f64 = 0.7;
const RNG_STREAM: u64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: i64,
    pub ean: String,
    pub product_name: String,
    pub category: String,
    pub subcategory: String,
    pub brand: String,
    pub unit_price: Decimal,
    pub unit_size: &'static str,
    pub vat_rate: f64,
    pub is_active: bool,
}

/// Weighted modulo-10 check digit over 12 digits, weights 1 and 3 alternating from the left.
pub fn ean13_check_digit(digits: &str) -> Option<u32> {
    let mut sum = 0;
    for (idx, c) in digits.chars().enumerate() {
        let d = c.to_digit(10)?;
        sum += if idx % 2 == 0 { d } else { d * 3 };
    }

    Some((10 - sum % 10) % 10)
}

pub fn ean13(product_id: i64) -> String {
    let body = format!(
        "{EAN_PREFIX}{:04}{:05}",
        product_id.rem_euclid(10_000),
        product_id.rem_euclid(100_000)
    );
    // body is always 12 ascii digits
    let check = ean13_check_digit(&body).unwrap_or_default();

    format!("{body}{check}")
}

pub fn is_valid_ean13(ean: &str) -> bool {
    if ean.len() != 13 {
        return false;
    }
    let (body, check) = ean.split_at(12);
    match (ean13_check_digit(body), check.chars().next().and_then(|c| c.to_digit(10))) {
        (Some(expected), Some(actual)) => expected == actual,
        _ => false,
    }
}

/// Price range in cents for a category, inclusive.
pub fn price_range_cents(category: &str) -> (i64, i64) {
    if category.contains("Getränke") || category.contains("Brot") {
        (49, 399)
    } else if category.contains("Fleisch") || category.contains("Molkerei") {
        (199, 1299)
    } else if category.contains("Aktionswaren") {
        (499, 4999)
    } else {
        (99, 999)
    }
}

pub fn vat_rate(category: &str) -> f64 {
    if category.contains("Getränke") {
        VAT_REDUCED
    } else {
        VAT_STANDARD
    }
}

pub struct ProductGenerator<'a> {
    rng: StdRng,
    categories: &'a [String],
}

impl<'a> ProductGenerator<'a> {
    pub fn new(cfg: &'a GenerationConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(cfg.seed.wrapping_add(RNG_STREAM)),
            categories: &cfg.categories,
        }
    }

    pub fn generate(&mut self, num_products: usize) -> Vec<Product> {
        info!("generating {num_products} products...");
        (1..=num_products as i64).map(|id| self.product(id)).collect()
    }

    fn product(&mut self, product_id: i64) -> Product {
        let rng = &mut self.rng;
        let category = self.categories.choose(rng).cloned().unwrap_or_default();
        let head = category.split_whitespace().next().unwrap_or_default();

        let name: String = Word().fake_with_rng(rng);
        let sub: String = Word().fake_with_rng(rng);
        let brand: String = if rng.gen_bool(BRANDED_PROBABILITY) {
            CompanyName().fake_with_rng(rng)
        } else {
            HOUSE_BRAND.to_string()
        };

        let (lo, hi) = price_range_cents(&category);
        let unit_price = Decimal::new(rng.gen_range(lo..=hi), common::DECIMAL_SCALE as u32);

        Product {
            product_id,
            ean: ean13(product_id),
            product_name: format!("{} {head}", capitalize(&name)),
            subcategory: format!("{category} - {}", capitalize(&sub)),
            brand,
            unit_price,
            unit_size: UNIT_SIZES.choose(rng).copied().unwrap_or(UNIT_SIZES[0]),
            vat_rate: vat_rate(&category),
            is_active: rng.gen_bool(ACTIVE_PROBABILITY),
            category,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_check_digit() {
        assert_eq!(ean13_check_digit("400638133393"), Some(1));
        assert_eq!(ean13_check_digit("590123412345"), Some(7));
        assert_eq!(ean13_check_digit("40x638133393"), None);
        assert!(is_valid_ean13("4006381333931"));
        assert!(is_valid_ean13("5901234123457"));
        assert!(!is_valid_ean13("4006381333932"));
        assert!(!is_valid_ean13("400638133393"));
    }

    #[test]
    fn test_ean_layout() {
        let ean = ean13(123_456);
        assert_eq!(ean.len(), 13);
        assert!(ean.starts_with("400345623456"));
        assert!(is_valid_ean13(&ean));

        for id in [1, 9_999, 10_000, 99_999, 100_000, 1_234_567] {
            assert!(is_valid_ean13(&ean13(id)), "{id}");
        }
    }

    #[test]
    fn test_price_ranges() {
        assert_eq!(price_range_cents("Getränke"), (49, 399));
        assert_eq!(price_range_cents("Brot & Backwaren"), (49, 399));
        assert_eq!(price_range_cents("Fleisch & Wurst"), (199, 1299));
        assert_eq!(price_range_cents("Molkereiprodukte"), (199, 1299));
        assert_eq!(price_range_cents("Aktionswaren"), (499, 4999));
        assert_eq!(price_range_cents("Tiefkühlkost"), (99, 999));
        assert_eq!(vat_rate("Getränke"), VAT_REDUCED);
        assert_eq!(vat_rate("Tiefkühlkost"), VAT_STANDARD);
    }

    #[test]
    fn test_generate() {
        let cfg = GenerationConfig::new(42, 10, 500, 1000);
        let products = ProductGenerator::new(&cfg).generate(500);

        assert_eq!(products.len(), 500);
        let mut active = 0;
        for (idx, p) in products.iter().enumerate() {
            assert_eq!(p.product_id, idx as i64 + 1);
            assert!(is_valid_ean13(&p.ean));
            assert!(cfg.categories.contains(&p.category));
            assert!(p.subcategory.starts_with(&p.category));
            assert!(UNIT_SIZES.contains(&p.unit_size));
            assert_eq!(p.unit_price.scale(), 2);

            let (lo, hi) = price_range_cents(&p.category);
            assert!(p.unit_price >= Decimal::new(lo, 2) && p.unit_price <= Decimal::new(hi, 2));
            if p.is_active {
                active += 1;
            }
        }
        // ~95% active
        assert!(active > 440 && active < 500, "{active}");
    }

    #[test]
    fn test_deterministic() {
        let cfg = GenerationConfig::new(7, 10, 100, 1000);
        let a = ProductGenerator::new(&cfg).generate(50);
        let b = ProductGenerator::new(&cfg).generate(50);
        assert_eq!(a, b);
    }
}
