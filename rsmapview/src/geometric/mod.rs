pub mod osm_buildings;
