pub mod connectivity;
pub mod geonames;
pub mod global_variables;
pub mod nominatim;
pub mod open_meteo;
pub mod wikidata;
