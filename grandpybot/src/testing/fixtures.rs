//! Representative responses of the geocoding and encyclopedia services.

use serde_json::{json, Value};

/// Geocoding response for "Tour Eiffel" with address details.
#[must_use]
pub fn geocode_tour_eiffel() -> Value {
    json!([
        {
            "place_id": 307_417_958,
            "licence": "Data © OpenStreetMap contributors, ODbL 1.0. https://osm.org/copyright",
            "osm_type": "way",
            "osm_id": 5_013_364,
            "lat": "48.8582602",
            "lon": "2.2935247",
            "class": "man_made",
            "type": "tower",
            "place_rank": 30,
            "importance": 0.671_571_812_255_267_1,
            "addresstype": "man_made",
            "name": "Tour Eiffel",
            "display_name": "Tour Eiffel, 5, Avenue Anatole France, Quartier du Gros-Caillou, Paris 7e Arrondissement, Paris, Île-de-France, France métropolitaine, 75007, France",
            "address": {
                "man_made": "Tour Eiffel",
                "house_number": "5",
                "road": "Avenue Anatole France",
                "city": "Paris",
                "state": "Île-de-France",
                "postcode": "75007",
                "country": "France",
                "country_code": "fr"
            },
            "boundingbox": ["48.8574753", "48.8590465", "2.2933084", "2.2956897"]
        }
    ])
}

/// Geosearch response with three pages around central Paris.
#[must_use]
pub fn geosearch_paris() -> Value {
    json!({
        "batchcomplete": "",
        "query": {
            "geosearch": [
                {
                    "pageid": 681_159,
                    "ns": 0,
                    "title": "Musée du Louvre",
                    "lat": 48.861_1,
                    "lon": 2.335_8,
                    "dist": 3120.4,
                    "primary": ""
                },
                {
                    "pageid": 1_359_783,
                    "ns": 0,
                    "title": "Tour Eiffel",
                    "lat": 48.858_26,
                    "lon": 2.294_5,
                    "dist": 54.2,
                    "primary": ""
                },
                {
                    "pageid": 2_785_041,
                    "ns": 0,
                    "title": "Champ-de-Mars",
                    "lat": 48.855_6,
                    "lon": 2.298_3,
                    "dist": 484.9,
                    "primary": ""
                }
            ]
        }
    })
}

/// Extract response for the Louvre page, HTML markup included.
#[must_use]
pub fn extract_louvre() -> Value {
    json!({
        "batchcomplete": "",
        "warnings": {
            "extracts": {
                "*": "HTML may be malformed and/or unbalanced and may omit inline images. Use at your own risk. Known problems are listed at https://www.mediawiki.org/wiki/Special:MyLanguage/Extension:TextExtracts#Caveats."
            }
        },
        "query": {
            "pages": {
                "681159": {
                    "pageid": 681_159,
                    "ns": 0,
                    "title": "Musée du Louvre",
                    "extract": "<p class=\"mw-empty-elt\">\n</p>\n<p>Le <b>musée du Louvre</b> est un musée situé dans le <a>1<sup>er</sup> arrondissement</a> de Paris, en France.  Une préfiguration en est imaginée en 1775-1776 par le comte d'Angiviller…</p>"
                }
            }
        }
    })
}

/// Minimal extract response for `page_id`.
#[must_use]
pub fn extract_for(page_id: u64, extract: &str) -> Value {
    let mut pages = serde_json::Map::new();
    pages.insert(
        page_id.to_string(),
        json!({"pageid": page_id, "ns": 0, "extract": extract}),
    );
    json!({"batchcomplete": "", "query": {"pages": pages}})
}
