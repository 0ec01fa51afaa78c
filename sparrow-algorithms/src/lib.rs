pub mod route_search;
