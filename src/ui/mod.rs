/// egui widgets: the top bar and filter panel, and the result views.
pub mod panels;
pub mod results;
