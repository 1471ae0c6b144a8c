//! Rendering resource generations.
//!
//! A [`Generation`] is the full set of drawable resources built for one
//! display configuration: background bitmap, hands layer and, on faces that
//! show it, the date label. Resources are only ever created and released
//! together, so a live face owns exactly one generation at a time.

use log::debug;

use crate::config::FaceLayout;
use crate::settings::DisplayConfig;
use crate::traits::{Background, RenderSurface, ResourceId, ResourceKind, ResourceSpec};

/// Two-colour palette of the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HandColor {
    /// Lit pixel.
    White,
    /// Unlit pixel.
    Black,
}

/// Colours derived from the inversion flag, fixed for a generation's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Theme {
    /// Background artwork.
    pub background: Background,
    /// Second hand stroke.
    pub second_hand: HandColor,
    /// Minute and hour hand interior.
    pub hand_fill: HandColor,
    /// Minute and hour hand border.
    pub hand_outline: HandColor,
}

impl Theme {
    /// Palette for `config`.
    pub const fn for_config(config: &DisplayConfig) -> Self {
        if config.inverted {
            Self {
                background: Background::Inverted,
                second_hand: HandColor::Black,
                hand_fill: HandColor::White,
                hand_outline: HandColor::Black,
            }
        } else {
            Self {
                background: Background::Normal,
                second_hand: HandColor::White,
                hand_fill: HandColor::White,
                hand_outline: HandColor::Black,
            }
        }
    }
}

/// Resources owned by one display configuration.
#[derive(Debug, PartialEq, Eq)]
pub struct Generation {
    id: u32,
    theme: Theme,
    background: ResourceId,
    hands: ResourceId,
    date: Option<ResourceId>,
}

impl Generation {
    /// Allocates every resource for `config`.
    ///
    /// If any allocation fails, the resources created so far are released
    /// before the error is returned.
    pub fn build<R: RenderSurface>(
        surface: &mut R,
        id: u32,
        config: &DisplayConfig,
        layout: &FaceLayout,
    ) -> Result<Self, R::Error> {
        let theme = Theme::for_config(config);

        let background = surface.create(&ResourceSpec::new(
            ResourceKind::Background(theme.background),
            layout.bounds,
        ))?;

        let hands = match surface.create(&ResourceSpec::new(ResourceKind::HandsLayer, layout.bounds)) {
            Ok(hands) => hands,
            Err(e) => {
                surface.destroy(background);
                return Err(e);
            }
        };

        let date = match layout.date_frame {
            Some(frame) => match surface.create(&ResourceSpec::new(ResourceKind::DateLabel, frame)) {
                Ok(date) => Some(date),
                Err(e) => {
                    surface.destroy(hands);
                    surface.destroy(background);
                    return Err(e);
                }
            },
            None => None,
        };

        debug!("generation {} built ({:?})", id, theme.background);
        Ok(Self {
            id,
            theme,
            background,
            hands,
            date,
        })
    }

    /// Releases every resource, in reverse creation order.
    pub fn release<R: RenderSurface>(self, surface: &mut R) {
        if let Some(date) = self.date {
            surface.destroy(date);
        }
        surface.destroy(self.hands);
        surface.destroy(self.background);
        debug!("generation {} released", self.id);
    }

    /// Monotonic generation number.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Palette in use.
    #[inline]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Background bitmap.
    #[inline]
    pub fn background(&self) -> ResourceId {
        self.background
    }

    /// Hands layer.
    #[inline]
    pub fn hands(&self) -> ResourceId {
        self.hands
    }

    /// Date label, if the face shows one.
    #[inline]
    pub fn date(&self) -> Option<ResourceId> {
        self.date
    }

    /// Number of live resources owned.
    pub fn resource_count(&self) -> usize {
        2 + usize::from(self.date.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockSurface;

    #[test]
    fn theme_follows_inversion() {
        let normal = Theme::for_config(&DisplayConfig::default());
        assert_eq!(normal.background, Background::Normal);
        assert_eq!(normal.second_hand, HandColor::White);

        let inverted = Theme::for_config(&DisplayConfig {
            inverted: true,
            ..DisplayConfig::default()
        });
        assert_eq!(inverted.background, Background::Inverted);
        assert_eq!(inverted.second_hand, HandColor::Black);
        assert_eq!(inverted.hand_fill, HandColor::White);
    }

    #[test]
    fn build_allocates_all_resources() {
        let mut surface = MockSurface::new();
        let generation =
            Generation::build(&mut surface, 1, &DisplayConfig::default(), &FaceLayout::default())
                .unwrap();
        assert_eq!(generation.resource_count(), 3);
        assert_eq!(surface.live().len(), 3);
        assert!(generation.date().is_some());
        assert_eq!(
            surface.kind_of(generation.background()),
            Some(ResourceKind::Background(Background::Normal))
        );
    }

    #[test]
    fn build_without_date_label() {
        let mut surface = MockSurface::new();
        let layout = FaceLayout::default().without_date();
        let generation =
            Generation::build(&mut surface, 1, &DisplayConfig::default(), &layout).unwrap();
        assert_eq!(generation.date(), None);
        assert_eq!(surface.live().len(), 2);
    }

    #[test]
    fn release_frees_in_reverse_order() {
        let mut surface = MockSurface::new();
        let generation =
            Generation::build(&mut surface, 1, &DisplayConfig::default(), &FaceLayout::default())
                .unwrap();
        let expected = [
            generation.date().unwrap(),
            generation.hands(),
            generation.background(),
        ];
        generation.release(&mut surface);
        assert!(surface.live().is_empty());
        assert_eq!(surface.destroyed, expected);
    }

    #[test]
    fn partial_failure_releases_created_resources() {
        let mut surface = MockSurface::new();
        surface.fail_after = Some(2);
        let result =
            Generation::build(&mut surface, 1, &DisplayConfig::default(), &FaceLayout::default());
        assert!(result.is_err());
        assert!(surface.live().is_empty());
        assert_eq!(surface.destroyed.len(), 2);
    }
}
