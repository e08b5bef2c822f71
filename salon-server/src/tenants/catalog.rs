//! Default service menus seeded into newly registered tenants

use shared::models::{BusinessType, ServiceCreate};

/// (name, category, price, minutes, description)
type CatalogEntry = (&'static str, &'static str, f64, i64, &'static str);

const BARBER: &[CatalogEntry] = &[
    ("Haircut (Adult)", "hair", 500.0, 30, "Professional haircut tailored to your style."),
    ("Haircut (Kids)", "hair", 300.0, 20, "Gentle, child-friendly haircut."),
    ("Beard Trim", "hair", 200.0, 15, "Clean shaping and trimming of the beard."),
    ("Beard Shave (Clean Shave)", "hair", 250.0, 20, "Smooth, close shave for a fresh look."),
    ("Hairline / Shape-up", "hair", 150.0, 10, "Precise edge-up for a sharp finish."),
    ("Hair Wash", "hair", 200.0, 15, "Refreshing wash and scalp cleanse."),
    ("Hair Dye (Men)", "hair", 1000.0, 45, "Color treatment for hair or beard."),
    ("Scalp Massage", "hair", 300.0, 15, "Relaxing massage to boost blood circulation."),
    ("Haircut + Beard Trim", "packages", 650.0, 45, "Complete grooming in one session."),
    ("Full Grooming Package", "packages", 1200.0, 75, "Haircut, beard, wash, and finishing touches."),
];

const SALON: &[CatalogEntry] = &[
    ("Hair Wash & Blow-dry", "hair", 800.0, 45, "Cleanse, dry, and style your hair."),
    ("Hair Styling", "hair", 1500.0, 60, "Styling for everyday or special occasions."),
    ("Braiding", "hair", 2500.0, 180, "Neat and stylish protective braids."),
    ("Weaving / Extensions", "hair", 3500.0, 120, "Hair extensions for length and volume."),
    ("Wig Installation", "hair", 2000.0, 90, "Secure and natural-looking wig fitting."),
    ("Hair Relaxing", "hair", 1500.0, 90, "Smoothening treatment for easy styling."),
    ("Hair Treatment", "hair", 1200.0, 45, "Nourishing care for damaged hair."),
    ("Hair Coloring", "hair", 3000.0, 120, "Professional hair color application."),
    ("Keratin Treatment", "hair", 5000.0, 180, "Long-lasting smooth and frizz-free hair."),
    ("Manicure", "nails", 800.0, 45, "Nail shaping, cleaning, and polish for hands."),
    ("Pedicure", "nails", 1000.0, 60, "Foot care, nail grooming, and polish."),
    ("Gel Nails", "nails", 1500.0, 60, "Long-lasting gel polish finish."),
    ("Acrylic Nails", "nails", 2500.0, 90, "Strong nail extensions with custom shapes."),
    ("Nail Art", "nails", 500.0, 30, "Creative designs and decorative nail styling."),
    ("Nail Repair", "nails", 200.0, 15, "Fixing broken or damaged nails."),
    ("Makeup (Casual)", "makeup", 1500.0, 45, "Light makeup for everyday wear."),
    ("Bridal Makeup", "makeup", 5000.0, 120, "Elegant makeup for weddings."),
    ("Event Makeup", "makeup", 3000.0, 90, "Glamorous look for special events."),
    ("Photoshoot Makeup", "makeup", 3500.0, 90, "Camera-ready professional makeup."),
];

const SPA: &[CatalogEntry] = &[
    ("Full Body Massage", "massage", 3500.0, 60, "Relaxing massage for overall wellness."),
    ("Swedish Massage", "massage", 3000.0, 60, "Gentle massage for relaxation and stress relief."),
    ("Deep Tissue Massage", "massage", 4000.0, 60, "Targets muscle tension and pain."),
    ("Hot Stone Massage", "massage", 4500.0, 90, "Warm stones for deep muscle relaxation."),
    ("Reflexology", "massage", 2000.0, 45, "Pressure-point therapy on feet and hands."),
    ("Head & Shoulder Massage", "massage", 1500.0, 30, "Relieves tension in upper body."),
    ("Facial Treatment", "facial", 2500.0, 45, "Refreshes and revitalizes the skin."),
    ("Deep Cleansing Facial", "facial", 3000.0, 60, "Removes impurities and unclogs pores."),
    ("Anti-Aging Facial", "facial", 4000.0, 60, "Improves skin tone and reduces fine lines."),
    ("Acne Treatment", "facial", 3500.0, 60, "Targets breakouts and skin irritation."),
    ("Body Scrub", "body", 2500.0, 45, "Exfoliates dead skin for smoothness."),
    ("Body Wrap", "body", 3500.0, 60, "Nourishing treatment to hydrate and detoxify skin."),
    ("Detox Treatment", "body", 4000.0, 60, "Helps remove toxins and refresh the body."),
];

fn entries(business_type: BusinessType) -> Vec<&'static CatalogEntry> {
    match business_type {
        BusinessType::Kinyozi => BARBER.iter().collect(),
        BusinessType::Salon => SALON.iter().collect(),
        BusinessType::Spa => SPA.iter().collect(),
        BusinessType::MultiService => BARBER.iter().chain(SALON).chain(SPA).collect(),
    }
}

/// The default menu for a new tenant of `business_type`
pub fn default_services(tenant_id: i64, business_type: BusinessType) -> Vec<ServiceCreate> {
    entries(business_type)
        .into_iter()
        .map(|(name, category, price, minutes, description)| ServiceCreate {
            tenant_id,
            name: (*name).to_string(),
            category: (*category).to_string(),
            description: Some((*description).to_string()),
            price: *price,
            duration_minutes: *minutes,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_sizes_by_business_type() {
        assert_eq!(default_services(1, BusinessType::Kinyozi).len(), 10);
        assert_eq!(default_services(1, BusinessType::Salon).len(), 19);
        assert_eq!(default_services(1, BusinessType::Spa).len(), 13);
        assert_eq!(default_services(1, BusinessType::MultiService).len(), 42);
    }

    #[test]
    fn entries_are_owned_by_the_tenant() {
        let menu = default_services(7, BusinessType::Kinyozi);
        assert!(menu.iter().all(|s| s.tenant_id == 7));
        assert_eq!(menu[0].name, "Haircut (Adult)");
        assert_eq!(menu[0].price, 500.0);
    }
}
