//! Placeholder listings served whenever live retrieval fails.
//!
//! The catalog is fixed at compile time and partitioned by shop name; shops that
//! are not part of the reference deployment have no fallback entries.

use once_cell::sync::Lazy;

use crate::domain::constants::catalog::PLACEHOLDER_IMAGE;
use crate::domain::item::Item;

/// (id, title, shop, price, tags)
const ENTRIES: &[(&str, &str, &str, &str, &[&str])] = &[
    ("1", "ファンタジーイラスト集 Vol.1", "hentai365", "¥500", &["イラスト集", "ファンタジー"]),
    ("2", "SF世界のキャラクターデザイン", "hentai366", "¥800", &["イラスト集", "SF"]),
    ("3", "魔法少女イラストコレクション", "hentai367", "¥1,000", &["イラスト集", "ファンタジー", "デジタル"]),
    ("4", "未来都市の風景画集", "hentai365", "¥1,500", &["イラスト集", "SF", "デジタル"]),
    ("5", "ドラゴンと騎士のイラスト集", "hentai366", "¥2,000", &["イラスト集", "ファンタジー"]),
    ("6", "宇宙船デザイン集", "hentai367", "¥1,200", &["イラスト集", "SF"]),
    ("7", "キャラクターポーズ集", "hentai365", "¥900", &["イラスト集", "デジタル", "ポーズ集"]),
    ("8", "エルフと妖精のイラスト集", "hentai366", "¥700", &["イラスト集", "ファンタジー", "デジタル"]),
    ("9", "ロボットデザイン集", "hentai367", "¥1,300", &["イラスト集", "SF", "メカ"]),
    ("10", "水彩風デジタルイラスト集", "hentai365", "¥1,100", &["イラスト集", "水彩", "デジタル"]),
    ("11", "魔法使いのキャラクターデザイン", "hentai366", "¥850", &["イラスト集", "ファンタジー", "キャラクターデザイン"]),
    ("12", "サイバーパンクイラスト集", "hentai367", "¥1,400", &["イラスト集", "SF", "サイバーパンク"]),
];

static CATALOG: Lazy<Vec<Item>> = Lazy::new(|| {
    ENTRIES
        .iter()
        .map(|(id, title, shop, price, tags)| Item {
            id: (*id).to_string(),
            title: (*title).to_string(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
            url: format!("https://{shop}.booth.pm/items/{id}"),
            price: (*price).to_string(),
            shop: (*shop).to_string(),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
        })
        .collect()
});

/// The whole catalog, used when every shop came back empty.
pub fn all() -> &'static [Item] {
    &CATALOG
}

/// Catalog entries belonging to one shop, in catalog order.
pub fn for_shop(shop_name: &str) -> Vec<Item> {
    CATALOG
        .iter()
        .filter(|item| item.shop == shop_name)
        .cloned()
        .collect()
}
