//! Built-in place data for the supported locales.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Result;
use crate::error::RetailGenError;

const DE_CITIES: [&str; 40] = [
    "Berlin",
    "Hamburg",
    "München",
    "Köln",
    "Frankfurt am Main",
    "Stuttgart",
    "Düsseldorf",
    "Leipzig",
    "Dortmund",
    "Essen",
    "Bremen",
    "Dresden",
    "Hannover",
    "Nürnberg",
    "Duisburg",
    "Bochum",
    "Wuppertal",
    "Bielefeld",
    "Bonn",
    "Münster",
    "Mannheim",
    "Karlsruhe",
    "Augsburg",
    "Wiesbaden",
    "Mönchengladbach",
    "Gelsenkirchen",
    "Aachen",
    "Braunschweig",
    "Kiel",
    "Chemnitz",
    "Halle (Saale)",
    "Magdeburg",
    "Freiburg im Breisgau",
    "Krefeld",
    "Mainz",
    "Lübeck",
    "Erfurt",
    "Rostock",
    "Kassel",
    "Saarbrücken",
];

const DE_STREETS: [&str; 30] = [
    "Hauptstraße",
    "Schulstraße",
    "Gartenstraße",
    "Bahnhofstraße",
    "Dorfstraße",
    "Bergstraße",
    "Birkenweg",
    "Lindenstraße",
    "Kirchstraße",
    "Waldstraße",
    "Ringstraße",
    "Schillerstraße",
    "Goethestraße",
    "Wiesenweg",
    "Jahnstraße",
    "Mühlenweg",
    "Am Sportplatz",
    "Rosenstraße",
    "Industriestraße",
    "Feldstraße",
    "Buchenweg",
    "Poststraße",
    "Friedhofstraße",
    "Mozartstraße",
    "Eichenweg",
    "Marktplatz",
    "Lessingstraße",
    "Blumenstraße",
    "Parkstraße",
    "Talstraße",
];

/// Place data used to synthesize store addresses.
#[derive(Debug, Clone)]
pub struct Locale {
    pub tag: String,
    cities: &'static [&'static str],
    streets: &'static [&'static str],
    postcodes: (u32, u32),
    latitude: (f64, f64),
    longitude: (f64, f64),
}

impl Locale {
    pub fn try_from_tag(tag: &str) -> Result<Self> {
        match tag {
            "de_DE" => Ok(Self {
                tag: tag.to_string(),
                cities: &DE_CITIES,
                streets: &DE_STREETS,
                postcodes: (1067, 99998),
                latitude: (47.3, 55.0),
                longitude: (5.9, 15.0),
            }),
            other => Err(RetailGenError::Dependency(format!(
                "no locale backend available for {other:?}"
            ))),
        }
    }

    pub fn city<R: Rng>(&self, rng: &mut R) -> String {
        self.cities.choose(rng).unwrap_or(&"").to_string()
    }

    pub fn street_address<R: Rng>(&self, rng: &mut R) -> String {
        let street = self.streets.choose(rng).unwrap_or(&"");
        let number: u32 = rng.gen_range(1..200);
        format!("{street} {number}")
    }

    pub fn postcode<R: Rng>(&self, rng: &mut R) -> String {
        format!("{:05}", rng.gen_range(self.postcodes.0..=self.postcodes.1))
    }

    /// Rounded to 6 decimals.
    pub fn latitude<R: Rng>(&self, rng: &mut R) -> f64 {
        round6(rng.gen_range(self.latitude.0..self.latitude.1))
    }

    pub fn longitude<R: Rng>(&self, rng: &mut R) -> f64 {
        round6(rng.gen_range(self.longitude.0..self.longitude.1))
    }
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::Locale;
    use crate::error::RetailGenError;

    #[test]
    fn test_unknown_locale() {
        assert!(matches!(
            Locale::try_from_tag("xx_XX"),
            Err(RetailGenError::Dependency(_))
        ));
    }

    #[test]
    fn test_german_data() {
        let locale = Locale::try_from_tag("de_DE").unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..1000 {
            let pc = locale.postcode(&mut rng);
            assert_eq!(pc.len(), 5);
            assert!(pc.chars().all(|c| c.is_ascii_digit()));

            let lat = locale.latitude(&mut rng);
            let lon = locale.longitude(&mut rng);
            assert!((47.0..=55.0).contains(&lat));
            assert!((5.0..=15.0).contains(&lon));

            assert!(!locale.city(&mut rng).is_empty());
            assert!(locale.street_address(&mut rng).contains(' '));
        }
    }
}
