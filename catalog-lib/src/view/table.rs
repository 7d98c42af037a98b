//! Table projection.

use crate::model::Product;
use crate::model::ProductId;

/// Shown in place of a missing optional field.
pub const PLACEHOLDER: &str = "–";

/// A table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Brand,
    Category,
    Price,
    Rating,
}

impl Column {
    /// Header label.
    pub fn label(self) -> &'static str {
        match self {
            Column::Title => "Title",
            Column::Brand => "Brand",
            Column::Category => "Category",
            Column::Price => "Price",
            Column::Rating => "Rating",
        }
    }

    /// Only the title is editable.
    pub fn is_editable(self) -> bool {
        matches!(self, Column::Title)
    }
}

/// Columns in display order.
pub const COLUMNS: [Column; 5] = [
    Column::Title,
    Column::Brand,
    Column::Category,
    Column::Price,
    Column::Rating,
];

/// One product formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub id: ProductId,
    pub title: String,
    pub brand: String,
    pub category: String,
    pub price: String,
    pub rating: String,
}

impl ProductRow {
    /// Formats a product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            brand: optional(product.brand.as_deref()),
            category: optional(product.category.as_deref()),
            price: format_price(product.price),
            rating: format_rating(product.rating),
        }
    }

    /// Returns the cell text for `column`.
    pub fn cell(&self, column: Column) -> &str {
        match column {
            Column::Title => &self.title,
            Column::Brand => &self.brand,
            Column::Category => &self.category,
            Column::Price => &self.price,
            Column::Rating => &self.rating,
        }
    }
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self::from_product(product)
    }
}

/// Formats a price with a currency prefix and two decimals.
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Formats a rating, or the placeholder when absent.
pub fn format_rating(rating: Option<f64>) -> String {
    rating.map_or_else(|| PLACEHOLDER.to_string(), |r| r.to_string())
}

fn optional(value: Option<&str>) -> String {
    value.unwrap_or(PLACEHOLDER).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_row() {
        let product = Product::new(1, "Essence Mascara", 9.99)
            .with_brand("Essence")
            .with_category("beauty")
            .with_rating(4.94);
        let row = ProductRow::from(&product);
        assert_eq!(row.title, "Essence Mascara");
        assert_eq!(row.cell(Column::Brand), "Essence");
        assert_eq!(row.cell(Column::Category), "beauty");
        assert_eq!(row.cell(Column::Price), "$9.99");
        assert_eq!(row.cell(Column::Rating), "4.94");
    }

    #[test]
    fn test_missing_fields_use_placeholder() {
        let row = ProductRow::from(&Product::new(2, "Apple", 1.5));
        assert_eq!(row.brand, PLACEHOLDER);
        assert_eq!(row.category, PLACEHOLDER);
        assert_eq!(row.rating, PLACEHOLDER);
    }

    #[test]
    fn test_price_format() {
        assert_eq!(format_price(12.5), "$12.50");
        assert_eq!(format_price(1899.999), "$1900.00");
        assert_eq!(format_price(0.0), "$0.00");
    }

    #[test]
    fn test_only_title_editable() {
        let editable: Vec<_> = COLUMNS.iter().filter(|c| c.is_editable()).collect();
        assert_eq!(editable, [&Column::Title]);
    }
}
