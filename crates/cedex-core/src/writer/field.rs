//! Closed registry of field names.

use std::fmt;

macro_rules! field_registry {
    ($($name:ident),* $(,)?) => {
        /// A field name of the interchange log.
        ///
        /// The vocabulary is closed: a record can only write names listed here.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Field {
            $($name),*
        }

        impl Field {
            /// Every field, in registry order.
            pub const ALL: &'static [Field] = &[$(Field::$name),*];

            /// The name as written to the log.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Field::$name => stringify!($name)),*
                }
            }
        }
    };
}

field_registry! {
    Arc, Backsight, Base, Center, Clockwise, CloseTo, ClosingPoint, CoordinateSystem,
    DeactivatedLabel, Default, DefaultEntryUnit, Delete, DirLine, Direction, Direction1,
    Direction2, DistLine, Distance, Distance1, Distance2, Edit, End, Entity, EntryFromEnd,
    EntryString, ExtendFromEnd, Face, Features, FirstArc, Fixed, Font, ForeignKey, From, From1,
    From2, GroupId, Height, HighestId, Id, Ids, Key, LayerId, Left, Length, Line, Line1, Line2,
    LineString, LineType, Lines, LowestId, MachineName, NewLine, NewLine1, NewLine2, NewPoint,
    NewX, NewY, Offset, OldPolygonX, OldPolygonY, OldX, OldY, OtherSide, Point, PointType,
    Points, PolygonX, PolygonY, PositionRatio, ProjectId, ProjectName, Radius, RefLine,
    ReverseArc, Rotation, Sections, Source, SplitAfter, SplitAfter1, SplitAfter2, SplitBefore,
    SplitBefore1, SplitBefore2, Start, Table, Template, Term1, Term2, Text, To, Topological,
    Type, Unit, UserName, Value, When, Width, X, Y,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
