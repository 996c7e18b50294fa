//! Image commands. Images are addressed by id on the current slide; paint order
//! comes from `z_index`, never from the position in `images`.

use log::debug;

use super::{ensure_finite, ensure_positive_size, Editor, Selected};
use crate::errors::{EditorError, Result};
use crate::models::{
    common::ElementId,
    image::{next_z_index, Image, ZOrderCommand},
};

impl Editor {
    fn image_mut(&mut self, id: &ElementId) -> Result<&mut Image> {
        self.current_slide_mut()?
            .image_mut(id)
            .ok_or_else(|| EditorError::NotFound(format!("image {}", id)))
    }

    fn clear_image_selection_if(&mut self, removed: impl Fn(&ElementId) -> bool) {
        if let Some(Selected::Image(id)) = &self.selected {
            if removed(id) {
                self.selected = None;
            }
        }
    }

    pub fn move_image(&mut self, id: &ElementId, x: f64, y: f64) -> Result<()> {
        ensure_finite(&[x, y])?;
        let image = self.image_mut(id)?;
        image.x = x;
        image.y = y;
        self.touch();
        Ok(())
    }

    pub fn resize_image(&mut self, id: &ElementId, width: f64, height: f64) -> Result<()> {
        ensure_positive_size(width, height)?;
        let image = self.image_mut(id)?;
        image.width = width;
        image.height = height;
        self.touch();
        Ok(())
    }

    /// Restacks one image relative to the other images and the text layer.
    pub fn set_image_z_order(&mut self, id: &ElementId, order: ZOrderCommand) -> Result<()> {
        let slide = self.current_slide_mut()?;
        let all: Vec<i32> = slide.images.iter().map(|i| i.z_index).collect();
        let image = slide
            .image_mut(id)
            .ok_or_else(|| EditorError::NotFound(format!("image {}", id)))?;
        let next = next_z_index(order, image.z_index, &all);
        debug!("Image {} z-index {} -> {} ({:?})", id, image.z_index, next, order);
        if next != image.z_index {
            image.z_index = next;
            self.touch();
        }
        Ok(())
    }

    /// Same as [`Editor::set_image_z_order`] for the selected image.
    pub fn set_selected_image_z_order(&mut self, order: ZOrderCommand) -> Result<()> {
        match self.selected.clone() {
            Some(Selected::Image(id)) => self.set_image_z_order(&id, order),
            _ => Err(EditorError::NoSelection),
        }
    }

    pub fn remove_image(&mut self, id: &ElementId) -> Result<()> {
        let slide = self.current_slide_mut()?;
        let pos = slide
            .images
            .iter()
            .position(|i| &i.id == id)
            .ok_or_else(|| EditorError::NotFound(format!("image {}", id)))?;
        slide.images.remove(pos);
        self.clear_image_selection_if(|selected| selected == id);
        self.touch();
        Ok(())
    }

    /// Removes every image on the current slide, legacy entries included.
    pub fn remove_all_images(&mut self) -> Result<()> {
        let slide = self.current_slide_mut()?;
        if !slide.has_any_image() {
            return Ok(());
        }
        slide.images.clear();
        slide.image = None;
        self.clear_image_selection_if(|_| true);
        self.touch();
        Ok(())
    }

    /// Removes the picture that came from the legacy single-image field.
    ///
    /// Clears `image` and drops the entries migrated out of it; uploaded images stay.
    pub fn remove_legacy_image(&mut self) -> Result<()> {
        let slide = self.current_slide_mut()?;
        let removed: Vec<ElementId> = slide
            .images
            .iter()
            .filter(|i| i.from_legacy)
            .map(|i| i.id.clone())
            .collect();
        if slide.image.is_none() && removed.is_empty() {
            return Err(EditorError::NotFound("legacy image".to_string()));
        }
        slide.image = None;
        slide.images.retain(|i| !i.from_legacy);
        self.clear_image_selection_if(|selected| removed.contains(selected));
        self.touch();
        Ok(())
    }
}
